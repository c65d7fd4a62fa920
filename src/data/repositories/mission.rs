use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sql_types::Integer;

use crate::data::models::{Mission, NewMission};
use crate::schema::{missions, study_records, subjects, topics};

pub struct MissionRepository;

impl MissionRepository {
    pub fn create(
        conn: &mut SqliteConnection,
        user_id: i32,
        name: &str,
        exam_date: Option<NaiveDate>,
    ) -> Result<Mission, diesel::result::Error> {
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::insert_into(missions::table)
                .values(&NewMission { user_id, name, exam_date })
                .execute(conn)?;

            let mission_id = diesel::select(diesel::dsl::sql::<Integer>("last_insert_rowid()"))
                .get_result::<i32>(conn)?;

            missions::table
                .find(mission_id)
                .select(Mission::as_select())
                .first(conn)
        })
    }

    pub fn list_for_user(
        conn: &mut SqliteConnection,
        user_id: i32,
    ) -> Result<Vec<Mission>, diesel::result::Error> {
        missions::table
            .filter(missions::user_id.eq(user_id))
            .order_by(missions::name.asc())
            .select(Mission::as_select())
            .load(conn)
    }

    /// Returns the mission only if it belongs to `user_id`.
    pub fn find_owned(
        conn: &mut SqliteConnection,
        user_id: i32,
        mission_id: i32,
    ) -> Result<Option<Mission>, diesel::result::Error> {
        missions::table
            .filter(missions::mission_id.eq(mission_id))
            .filter(missions::user_id.eq(user_id))
            .select(Mission::as_select())
            .first(conn)
            .optional()
    }

    /// Deletes a mission with its syllabus and study records.
    /// Returns false when the mission does not exist or is not owned.
    pub fn delete(
        conn: &mut SqliteConnection,
        user_id: i32,
        mission_id: i32,
    ) -> Result<bool, diesel::result::Error> {
        if Self::find_owned(conn, user_id, mission_id)?.is_none() {
            return Ok(false);
        }

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let subject_ids = subjects::table
                .filter(subjects::mission_id.eq(mission_id))
                .select(subjects::subject_id);

            diesel::delete(topics::table.filter(topics::subject_id.eq_any(subject_ids)))
                .execute(conn)?;
            diesel::delete(subjects::table.filter(subjects::mission_id.eq(mission_id)))
                .execute(conn)?;
            diesel::delete(study_records::table.filter(study_records::mission_id.eq(mission_id)))
                .execute(conn)?;
            diesel::delete(missions::table.filter(missions::mission_id.eq(mission_id)))
                .execute(conn)?;
            Ok(())
        })?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::bootstrap::test_connection;
    use crate::data::models::NewStudyRecord;
    use crate::data::repositories::{StudyRecordRepository, SyllabusRepository, UserRepository};

    #[test]
    fn create_and_list_missions_per_user() {
        let mut conn = test_connection();
        let ana = UserRepository::create_user(&mut conn, "ana@example.com", "h").unwrap();
        let bia = UserRepository::create_user(&mut conn, "bia@example.com", "h").unwrap();

        let exam = NaiveDate::from_ymd_opt(2025, 11, 9);
        let tj = MissionRepository::create(&mut conn, ana.user_id, "TJ-SP Escrevente", exam).unwrap();
        MissionRepository::create(&mut conn, ana.user_id, "INSS Técnico", None).unwrap();
        MissionRepository::create(&mut conn, bia.user_id, "ENEM", None).unwrap();

        assert_eq!(tj.name, "TJ-SP Escrevente");
        assert_eq!(tj.exam_date, exam);

        let names: Vec<String> = MissionRepository::list_for_user(&mut conn, ana.user_id)
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["INSS Técnico", "TJ-SP Escrevente"]);
    }

    #[test]
    fn find_owned_checks_owner() {
        let mut conn = test_connection();
        let ana = UserRepository::create_user(&mut conn, "ana@example.com", "h").unwrap();
        let bia = UserRepository::create_user(&mut conn, "bia@example.com", "h").unwrap();
        let mission = MissionRepository::create(&mut conn, ana.user_id, "OAB", None).unwrap();

        assert!(MissionRepository::find_owned(&mut conn, ana.user_id, mission.mission_id).unwrap().is_some());
        assert!(MissionRepository::find_owned(&mut conn, bia.user_id, mission.mission_id).unwrap().is_none());
    }

    #[test]
    fn delete_cascades_syllabus_and_records() {
        let mut conn = test_connection();
        let ana = UserRepository::create_user(&mut conn, "ana@example.com", "h").unwrap();
        let bia = UserRepository::create_user(&mut conn, "bia@example.com", "h").unwrap();
        let mission = MissionRepository::create(&mut conn, ana.user_id, "OAB", None).unwrap();
        let keep = MissionRepository::create(&mut conn, ana.user_id, "ENEM", None).unwrap();

        let subject = SyllabusRepository::add_subject(&mut conn, mission.mission_id, "Ética").unwrap();
        SyllabusRepository::add_topic(&mut conn, subject.subject_id, "Estatuto da OAB").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1);
        let ethics = NewStudyRecord::new(ana.user_id, mission.mission_id, date, "Ética", "Estatuto", 8, 10);
        StudyRecordRepository::insert(&mut conn, &ethics).unwrap();
        let essay = NewStudyRecord::new(ana.user_id, keep.mission_id, date, "Redação", "Tema", 1, 1);
        StudyRecordRepository::insert(&mut conn, &essay).unwrap();

        assert!(!MissionRepository::delete(&mut conn, bia.user_id, mission.mission_id).unwrap());
        assert!(MissionRepository::delete(&mut conn, ana.user_id, mission.mission_id).unwrap());

        assert!(MissionRepository::find_owned(&mut conn, ana.user_id, mission.mission_id).unwrap().is_none());
        assert_eq!(topics::table.count().get_result::<i64>(&mut conn).unwrap(), 0);
        assert_eq!(subjects::table.count().get_result::<i64>(&mut conn).unwrap(), 0);
        let remaining = StudyRecordRepository::list_for_mission(&mut conn, ana.user_id, keep.mission_id).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(study_records::table.count().get_result::<i64>(&mut conn).unwrap(), 1);
    }
}
