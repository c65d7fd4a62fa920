use serde::{Deserialize, Serialize};

use crate::data::models::StudyRecord;

/// The four fixed spaced-repetition checkpoints after a study session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReviewPhase {
    #[serde(rename = "24h")]
    Day1,
    #[serde(rename = "07d")]
    Day7,
    #[serde(rename = "15d")]
    Day15,
    #[serde(rename = "30d")]
    Day30,
}

impl ReviewPhase {
    /// Longest interval first. The scheduler takes the first unmet phase in
    /// this order, so a record is never due in two phases at once.
    pub const DESCENDING: [ReviewPhase; 4] = [
        ReviewPhase::Day30,
        ReviewPhase::Day15,
        ReviewPhase::Day7,
        ReviewPhase::Day1,
    ];

    pub fn threshold_days(self) -> i64 {
        match self {
            ReviewPhase::Day1 => 1,
            ReviewPhase::Day7 => 7,
            ReviewPhase::Day15 => 15,
            ReviewPhase::Day30 => 30,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ReviewPhase::Day1 => "24h",
            ReviewPhase::Day7 => "07d",
            ReviewPhase::Day15 => "15d",
            ReviewPhase::Day30 => "30d",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReviewPhase::Day1 => "🔥 D1",
            ReviewPhase::Day7 => "📅 D7",
            ReviewPhase::Day15 => "🧠 D15",
            ReviewPhase::Day30 => "💎 D30",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::DESCENDING.into_iter().find(|phase| phase.code() == code)
    }

    /// Whether the record's guarding flag for this phase is already set.
    pub fn is_reviewed(self, record: &StudyRecord) -> bool {
        match self {
            ReviewPhase::Day1 => record.reviewed_24h,
            ReviewPhase::Day7 => record.reviewed_07d,
            ReviewPhase::Day15 => record.reviewed_15d,
            ReviewPhase::Day30 => record.reviewed_30d,
        }
    }

    /// Position in dashboard ordering; lower is more urgent.
    pub fn urgency_rank(self) -> usize {
        Self::DESCENDING
            .iter()
            .position(|phase| *phase == self)
            .unwrap_or(Self::DESCENDING.len())
    }
}

/// Accuracy-derived colour class for a record or subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Bad,
    Medium,
    Good,
}

impl Severity {
    pub fn from_accuracy(accuracy_rate: f64) -> Self {
        if accuracy_rate < 60.0 {
            Severity::Bad
        } else if accuracy_rate < 80.0 {
            Severity::Medium
        } else {
            Severity::Good
        }
    }
}
