use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::data::models::StudyRecord;
use crate::features::pendencies::Severity;
use crate::utils::fold_label;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectMetrics {
    pub subject: String,
    pub sessions: usize,
    pub questions: i64,
    pub correct: i64,
    pub accuracy: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionMetrics {
    pub sessions: usize,
    pub questions: i64,
    pub correct: i64,
    pub accuracy: Option<f64>,
    pub study_days: usize,
    /// Weakest subject first
    pub by_subject: Vec<SubjectMetrics>,
}

#[derive(Default)]
struct Tally {
    subject: String,
    sessions: usize,
    questions: i64,
    correct: i64,
}

/// Aggregates a mission's records into totals and per-subject accuracy.
///
/// Accuracy is recomputed from the summed counts rather than averaging the
/// stored per-record rates, so long sessions weigh more than short ones.
pub fn summarize(records: &[StudyRecord]) -> MissionMetrics {
    let mut tallies: HashMap<String, Tally> = HashMap::new();
    let mut days = HashSet::new();
    let mut questions = 0i64;
    let mut correct = 0i64;

    for record in records {
        questions += i64::from(record.total_count);
        correct += i64::from(record.correct_count);
        if let Some(date) = record.study_date {
            days.insert(date);
        }

        let tally = tallies
            .entry(fold_label(&record.subject))
            .or_insert_with(|| Tally {
                subject: record.subject.clone(),
                ..Tally::default()
            });
        tally.sessions += 1;
        tally.questions += i64::from(record.total_count);
        tally.correct += i64::from(record.correct_count);
    }

    let mut by_subject: Vec<SubjectMetrics> = tallies
        .into_values()
        .filter(|tally| tally.questions > 0)
        .map(|tally| {
            let accuracy = percentage(tally.correct, tally.questions);
            SubjectMetrics {
                subject: tally.subject,
                sessions: tally.sessions,
                questions: tally.questions,
                correct: tally.correct,
                accuracy,
                severity: Severity::from_accuracy(accuracy),
            }
        })
        .collect();

    by_subject.sort_by(|a, b| {
        a.accuracy
            .total_cmp(&b.accuracy)
            .then_with(|| a.subject.cmp(&b.subject))
    });

    MissionMetrics {
        sessions: records.len(),
        questions,
        correct,
        accuracy: (questions > 0).then(|| percentage(correct, questions)),
        study_days: days.len(),
        by_subject,
    }
}

fn percentage(part: i64, whole: i64) -> f64 {
    part as f64 / whole as f64 * 100.0
}
