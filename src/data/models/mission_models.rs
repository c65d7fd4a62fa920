use chrono::{NaiveDate, NaiveDateTime};
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schema::{missions, subjects, topics};

/// An exam or competition the user is preparing for
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = missions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Mission {
    pub mission_id: i32,
    pub user_id: i32,
    pub name: String,
    pub exam_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = missions)]
pub struct NewMission<'a> {
    pub user_id: i32,
    pub name: &'a str,
    pub exam_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = subjects)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Subject {
    pub subject_id: i32,
    pub mission_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = topics)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Topic {
    pub topic_id: i32,
    pub subject_id: i32,
    pub name: String,
}

/// A subject together with its topics, as shown in the syllabus view
#[derive(Debug, Serialize)]
pub struct SubjectWithTopics {
    pub subject_id: i32,
    pub name: String,
    pub topics: Vec<Topic>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMissionRequest {
    #[validate(length(min = 1, max = 120, message = "Mission name must be 1-120 characters"))]
    pub name: String,
    #[serde(default)]
    pub exam_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1, max = 120, message = "Subject name must be 1-120 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTopicRequest {
    pub subject_id: i32,
    #[validate(length(min = 1, max = 200, message = "Topic name must be 1-200 characters"))]
    pub name: String,
}
