use chrono::{NaiveDate, NaiveDateTime};
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::schema::study_records;

/// One logged study session.
///
/// `study_date` and `accuracy_rate` are nullable in storage. Rows written by
/// other clients of the same database may lack them; the pendency scheduler
/// skips such rows instead of failing.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = study_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StudyRecord {
    pub record_id: i32,
    pub user_id: i32,
    pub mission_id: i32,
    pub study_date: Option<NaiveDate>,
    pub subject: String,
    pub topic: String,
    pub correct_count: i32,
    pub total_count: i32,
    pub accuracy_rate: Option<f64>,
    pub reviewed_24h: bool,
    pub reviewed_07d: bool,
    pub reviewed_15d: bool,
    pub reviewed_30d: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = study_records)]
pub struct NewStudyRecord<'a> {
    pub user_id: i32,
    pub mission_id: i32,
    pub study_date: Option<NaiveDate>,
    pub subject: &'a str,
    pub topic: &'a str,
    pub correct_count: i32,
    pub total_count: i32,
    pub accuracy_rate: Option<f64>,
}

impl<'a> NewStudyRecord<'a> {
    /// Accuracy is computed here, once, and stored with the row. Later
    /// updates to the review flags never touch it.
    pub fn new(
        user_id: i32,
        mission_id: i32,
        study_date: Option<NaiveDate>,
        subject: &'a str,
        topic: &'a str,
        correct_count: i32,
        total_count: i32,
    ) -> Self {
        let accuracy_rate = (total_count > 0)
            .then(|| f64::from(correct_count) / f64::from(total_count) * 100.0);

        Self {
            user_id,
            mission_id,
            study_date,
            subject,
            topic,
            correct_count,
            total_count,
            accuracy_rate,
        }
    }
}

/// Request payload for logging a study session
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_counts"))]
pub struct LogStudyRequest {
    #[validate(length(min = 1, max = 120, message = "Subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, max = 200, message = "Topic is required"))]
    pub topic: String,
    #[validate(range(min = 0, message = "Correct count cannot be negative"))]
    pub correct_count: i32,
    #[validate(range(min = 1, message = "Total count must be at least 1"))]
    pub total_count: i32,
    // Defaults to today when omitted
    #[serde(default)]
    pub study_date: Option<NaiveDate>,
}

#[cfg(test)]
impl StudyRecord {
    /// Unreviewed record with accuracy computed from the counts.
    pub fn fixture(record_id: i32, study_date: NaiveDate, correct_count: i32, total_count: i32) -> Self {
        Self {
            record_id,
            user_id: 1,
            mission_id: 1,
            study_date: Some(study_date),
            subject: "Matemática".into(),
            topic: "Porcentagem".into(),
            correct_count,
            total_count,
            accuracy_rate: Some(f64::from(correct_count) / f64::from(total_count) * 100.0),
            reviewed_24h: false,
            reviewed_07d: false,
            reviewed_15d: false,
            reviewed_30d: false,
            created_at: study_date.and_hms_opt(12, 0, 0).unwrap_or_default(),
        }
    }
}

fn validate_counts(request: &LogStudyRequest) -> Result<(), ValidationError> {
    if request.correct_count > request.total_count {
        let mut err = ValidationError::new("counts");
        err.message = Some("Correct count cannot exceed total count".into());
        return Err(err);
    }
    Ok(())
}
