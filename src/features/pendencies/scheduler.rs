use chrono::NaiveDate;
use serde::Serialize;

use super::phase::{ReviewPhase, Severity};
use crate::data::models::StudyRecord;

const DATE_FORMAT: &str = "%d/%m/%Y";

/// A study record that is currently due for review in one phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendencyEntry {
    pub record_id: i32,
    pub subject: String,
    pub topic: String,
    pub study_date: String,
    pub accuracy_rate: f64,
    pub severity: Severity,
    pub phase: ReviewPhase,
    pub label: &'static str,
    #[serde(skip)]
    pub studied_on: NaiveDate,
}

/// Computes which records are due for spaced review on `today`.
///
/// For each record the elapsed days since `study_date` are checked against
/// the phase thresholds from longest to shortest; the first phase whose
/// reviewed flag is still false wins. Records studied less than a day ago,
/// or with every elapsed phase already acknowledged, produce nothing.
///
/// Output follows input order with at most one entry per record. Records
/// missing `study_date` or `accuracy_rate` are skipped.
pub fn calculate_pendencies(records: &[StudyRecord], today: NaiveDate) -> Vec<PendencyEntry> {
    records
        .iter()
        .filter_map(|record| due_entry(record, today))
        .collect()
}

fn due_entry(record: &StudyRecord, today: NaiveDate) -> Option<PendencyEntry> {
    let (Some(studied_on), Some(accuracy_rate)) = (record.study_date, record.accuracy_rate) else {
        log::debug!("Skipping malformed study record {}", record.record_id);
        return None;
    };

    let elapsed_days = (today - studied_on).num_days();
    let phase = ReviewPhase::DESCENDING
        .into_iter()
        .find(|phase| elapsed_days >= phase.threshold_days() && !phase.is_reviewed(record))?;

    Some(PendencyEntry {
        record_id: record.record_id,
        subject: record.subject.clone(),
        topic: record.topic.clone(),
        study_date: studied_on.format(DATE_FORMAT).to_string(),
        accuracy_rate,
        severity: Severity::from_accuracy(accuracy_rate),
        phase,
        label: phase.label(),
        studied_on,
    })
}

/// Dashboard ordering: longest phase first, then oldest study date.
/// Stable, so equal entries keep scheduler order.
pub fn rank_by_urgency(entries: &mut [PendencyEntry]) {
    entries.sort_by_key(|entry| (entry.phase.urgency_rank(), entry.studied_on));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn studied_days_ago(record_id: i32, days: i64, correct: i32, total: i32) -> StudyRecord {
        StudyRecord::fixture(record_id, today() - Duration::days(days), correct, total)
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(calculate_pendencies(&[], today()).is_empty());
    }

    #[test]
    fn same_day_record_is_not_due() {
        let records = vec![studied_days_ago(1, 0, 5, 10)];
        assert!(calculate_pendencies(&records, today()).is_empty());
    }

    #[test]
    fn future_record_is_not_due() {
        let records = vec![studied_days_ago(1, -3, 5, 10)];
        assert!(calculate_pendencies(&records, today()).is_empty());
    }

    #[test]
    fn one_day_old_record_is_due_for_d1() {
        let records = vec![studied_days_ago(1, 1, 7, 10)];
        let entries = calculate_pendencies(&records, today());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].phase, ReviewPhase::Day1);
        assert_eq!(entries[0].label, "🔥 D1");
        assert_eq!(entries[0].severity, Severity::Medium);
    }

    #[test]
    fn thirty_one_days_unreviewed_reports_d30() {
        let records = vec![studied_days_ago(42, 31, 5, 10)];
        let entries = calculate_pendencies(&records, today());

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.record_id, 42);
        assert_eq!(entry.phase, ReviewPhase::Day30);
        assert_eq!(entry.phase.code(), "30d");
        assert_eq!(entry.label, "💎 D30");
        assert_eq!(entry.severity, Severity::Bad);
        assert_eq!(entry.accuracy_rate, 50.0);
        assert_eq!(entry.study_date, "30/05/2024");
        assert_eq!(entry.subject, "Matemática");
        assert_eq!(entry.topic, "Porcentagem");
    }

    #[test]
    fn ten_days_reports_d7_good() {
        let records = vec![studied_days_ago(1, 10, 9, 10)];
        let entries = calculate_pendencies(&records, today());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].phase, ReviewPhase::Day7);
        assert_eq!(entries[0].severity, Severity::Good);
    }

    #[test]
    fn longest_unmet_threshold_wins() {
        let mut record = studied_days_ago(1, 29, 8, 10);
        record.reviewed_07d = true;
        let entries = calculate_pendencies(&[record], today());

        // 15d is the longest elapsed phase and still unreviewed
        assert_eq!(entries[0].phase, ReviewPhase::Day15);

        let mut record = studied_days_ago(2, 14, 8, 10);
        record.reviewed_07d = true;
        let entries = calculate_pendencies(&[record], today());
        assert_eq!(entries[0].phase, ReviewPhase::Day1);
    }

    #[test]
    fn twenty_nine_days_with_d15_and_d7_flags_falls_back() {
        let mut record = studied_days_ago(1, 29, 8, 10);
        record.reviewed_15d = true;
        let entries = calculate_pendencies(&[record.clone()], today());
        assert_eq!(entries[0].phase, ReviewPhase::Day7);

        record.reviewed_07d = true;
        let entries = calculate_pendencies(&[record], today());
        assert_eq!(entries[0].phase, ReviewPhase::Day1);
    }

    #[test]
    fn fully_reviewed_record_is_never_due() {
        for days in [0, 1, 7, 15, 30, 400] {
            let mut record = studied_days_ago(1, days, 3, 10);
            record.reviewed_24h = true;
            record.reviewed_07d = true;
            record.reviewed_15d = true;
            record.reviewed_30d = true;
            assert!(calculate_pendencies(&[record], today()).is_empty());
        }
    }

    #[test]
    fn only_elapsed_phase_already_reviewed_gives_nothing() {
        let mut record = studied_days_ago(1, 3, 3, 10);
        record.reviewed_24h = true;
        assert!(calculate_pendencies(&[record], today()).is_empty());
    }

    #[test]
    fn threshold_boundaries_are_inclusive() {
        let cases = [
            (6, ReviewPhase::Day1),
            (7, ReviewPhase::Day7),
            (14, ReviewPhase::Day7),
            (15, ReviewPhase::Day15),
            (29, ReviewPhase::Day15),
            (30, ReviewPhase::Day30),
        ];
        for (days, expected) in cases {
            let entries = calculate_pendencies(&[studied_days_ago(1, days, 1, 1)], today());
            assert_eq!(entries[0].phase, expected, "elapsed {days} days");
        }
    }

    #[test]
    fn malformed_records_are_skipped_without_aborting() {
        let mut no_date = studied_days_ago(1, 5, 5, 10);
        no_date.study_date = None;
        let mut no_accuracy = studied_days_ago(2, 5, 5, 10);
        no_accuracy.accuracy_rate = None;
        let fine = studied_days_ago(3, 5, 5, 10);

        let entries = calculate_pendencies(&[no_date, no_accuracy, fine], today());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].record_id, 3);
    }

    #[test]
    fn stored_accuracy_is_used_as_is() {
        let mut record = studied_days_ago(1, 2, 9, 10);
        record.accuracy_rate = Some(55.0);
        let entries = calculate_pendencies(&[record], today());
        assert_eq!(entries[0].accuracy_rate, 55.0);
        assert_eq!(entries[0].severity, Severity::Bad);
    }

    #[test]
    fn preserves_input_order_with_one_entry_per_record() {
        let records = vec![
            studied_days_ago(1, 2, 5, 10),
            studied_days_ago(2, 0, 5, 10),
            studied_days_ago(3, 45, 5, 10),
            studied_days_ago(4, 8, 5, 10),
        ];
        let entries = calculate_pendencies(&records, today());
        let ids: Vec<i32> = entries.iter().map(|e| e.record_id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn repeated_calls_give_identical_output() {
        let records = vec![
            studied_days_ago(1, 2, 5, 10),
            studied_days_ago(2, 16, 7, 10),
            studied_days_ago(3, 31, 9, 10),
        ];
        let first = calculate_pendencies(&records, today());
        let second = calculate_pendencies(&records, today());
        assert_eq!(first, second);
    }

    #[test]
    fn ranking_puts_longest_phase_then_oldest_first() {
        let records = vec![
            studied_days_ago(1, 2, 5, 10),
            studied_days_ago(2, 8, 5, 10),
            studied_days_ago(3, 31, 5, 10),
            studied_days_ago(4, 10, 5, 10),
            studied_days_ago(5, 16, 5, 10),
        ];
        let mut entries = calculate_pendencies(&records, today());
        rank_by_urgency(&mut entries);

        let ids: Vec<i32> = entries.iter().map(|e| e.record_id).collect();
        assert_eq!(ids, vec![3, 5, 4, 2, 1]);
    }
}
