use diesel::prelude::*;
use diesel::sql_types::Integer;

use crate::data::models::{Subject, SubjectWithTopics, Topic};
use crate::schema::{missions, subjects, topics};

pub struct SyllabusRepository;

impl SyllabusRepository {
    pub fn add_subject(
        conn: &mut SqliteConnection,
        mission_id: i32,
        name: &str,
    ) -> Result<Subject, diesel::result::Error> {
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::insert_into(subjects::table)
                .values((subjects::mission_id.eq(mission_id), subjects::name.eq(name)))
                .execute(conn)?;

            let subject_id = diesel::select(diesel::dsl::sql::<Integer>("last_insert_rowid()"))
                .get_result::<i32>(conn)?;

            subjects::table
                .find(subject_id)
                .select(Subject::as_select())
                .first(conn)
        })
    }

    pub fn add_topic(
        conn: &mut SqliteConnection,
        subject_id: i32,
        name: &str,
    ) -> Result<Topic, diesel::result::Error> {
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::insert_into(topics::table)
                .values((topics::subject_id.eq(subject_id), topics::name.eq(name)))
                .execute(conn)?;

            let topic_id = diesel::select(diesel::dsl::sql::<Integer>("last_insert_rowid()"))
                .get_result::<i32>(conn)?;

            topics::table
                .find(topic_id)
                .select(Topic::as_select())
                .first(conn)
        })
    }

    pub fn subjects_for_mission(
        conn: &mut SqliteConnection,
        mission_id: i32,
    ) -> Result<Vec<Subject>, diesel::result::Error> {
        subjects::table
            .filter(subjects::mission_id.eq(mission_id))
            .order_by(subjects::name.asc())
            .select(Subject::as_select())
            .load(conn)
    }

    pub fn topics_for_subject(
        conn: &mut SqliteConnection,
        subject_id: i32,
    ) -> Result<Vec<Topic>, diesel::result::Error> {
        topics::table
            .filter(topics::subject_id.eq(subject_id))
            .order_by(topics::name.asc())
            .select(Topic::as_select())
            .load(conn)
    }

    /// Full syllabus of a mission, subjects and topics sorted by name.
    pub fn load(
        conn: &mut SqliteConnection,
        mission_id: i32,
    ) -> Result<Vec<SubjectWithTopics>, diesel::result::Error> {
        let subjects = Self::subjects_for_mission(conn, mission_id)?;
        let subject_ids: Vec<i32> = subjects.iter().map(|s| s.subject_id).collect();

        let all_topics = topics::table
            .filter(topics::subject_id.eq_any(subject_ids))
            .order_by(topics::name.asc())
            .select(Topic::as_select())
            .load::<Topic>(conn)?;

        Ok(subjects
            .into_iter()
            .map(|subject| SubjectWithTopics {
                subject_id: subject.subject_id,
                topics: all_topics
                    .iter()
                    .filter(|topic| topic.subject_id == subject.subject_id)
                    .cloned()
                    .collect(),
                name: subject.name,
            })
            .collect())
    }

    /// Subject lookup scoped to the owning user.
    pub fn find_subject_owned(
        conn: &mut SqliteConnection,
        user_id: i32,
        subject_id: i32,
    ) -> Result<Option<Subject>, diesel::result::Error> {
        subjects::table
            .inner_join(missions::table)
            .filter(subjects::subject_id.eq(subject_id))
            .filter(missions::user_id.eq(user_id))
            .select(Subject::as_select())
            .first(conn)
            .optional()
    }

    /// Topic lookup scoped to the owning user.
    pub fn find_topic_owned(
        conn: &mut SqliteConnection,
        user_id: i32,
        topic_id: i32,
    ) -> Result<Option<Topic>, diesel::result::Error> {
        topics::table
            .inner_join(subjects::table.inner_join(missions::table))
            .filter(topics::topic_id.eq(topic_id))
            .filter(missions::user_id.eq(user_id))
            .select(Topic::as_select())
            .first(conn)
            .optional()
    }

    /// Deletes a subject and its topics.
    pub fn delete_subject(
        conn: &mut SqliteConnection,
        subject_id: i32,
    ) -> Result<(), diesel::result::Error> {
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(topics::table.filter(topics::subject_id.eq(subject_id))).execute(conn)?;
            diesel::delete(subjects::table.filter(subjects::subject_id.eq(subject_id))).execute(conn)?;
            Ok(())
        })
    }

    pub fn delete_topic(
        conn: &mut SqliteConnection,
        topic_id: i32,
    ) -> Result<(), diesel::result::Error> {
        diesel::delete(topics::table.filter(topics::topic_id.eq(topic_id))).execute(conn)?;
        Ok(())
    }
}
