use diesel::prelude::*;
use diesel::sql_types::Integer;

use crate::data::models::{NewStudyRecord, StudyRecord};
use crate::features::pendencies::ReviewPhase;
use crate::schema::study_records;

pub struct StudyRecordRepository;

impl StudyRecordRepository {
    pub fn insert(
        conn: &mut SqliteConnection,
        record: &NewStudyRecord<'_>,
    ) -> Result<StudyRecord, diesel::result::Error> {
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::insert_into(study_records::table)
                .values(record)
                .execute(conn)?;

            let record_id = diesel::select(diesel::dsl::sql::<Integer>("last_insert_rowid()"))
                .get_result::<i32>(conn)?;

            study_records::table
                .find(record_id)
                .select(StudyRecord::as_select())
                .first(conn)
        })
    }

    /// All records of one user's mission, most recent study date first.
    pub fn list_for_mission(
        conn: &mut SqliteConnection,
        user_id: i32,
        mission_id: i32,
    ) -> Result<Vec<StudyRecord>, diesel::result::Error> {
        study_records::table
            .filter(study_records::user_id.eq(user_id))
            .filter(study_records::mission_id.eq(mission_id))
            .order_by((study_records::study_date.desc(), study_records::record_id.desc()))
            .select(StudyRecord::as_select())
            .load(conn)
    }

    pub fn find_owned(
        conn: &mut SqliteConnection,
        user_id: i32,
        record_id: i32,
    ) -> Result<Option<StudyRecord>, diesel::result::Error> {
        study_records::table
            .filter(study_records::record_id.eq(record_id))
            .filter(study_records::user_id.eq(user_id))
            .select(StudyRecord::as_select())
            .first(conn)
            .optional()
    }

    /// Returns false when nothing was deleted.
    pub fn delete(
        conn: &mut SqliteConnection,
        user_id: i32,
        record_id: i32,
    ) -> Result<bool, diesel::result::Error> {
        let deleted = diesel::delete(
            study_records::table
                .filter(study_records::record_id.eq(record_id))
                .filter(study_records::user_id.eq(user_id)),
        )
        .execute(conn)?;
        Ok(deleted > 0)
    }

    /// Sets one phase's reviewed flag. Flags only ever go from false to true;
    /// no other column is touched. Returns false when the record is missing
    /// or not owned by `user_id`.
    pub fn mark_reviewed(
        conn: &mut SqliteConnection,
        user_id: i32,
        record_id: i32,
        phase: ReviewPhase,
    ) -> Result<bool, diesel::result::Error> {
        let target = study_records::table
            .filter(study_records::record_id.eq(record_id))
            .filter(study_records::user_id.eq(user_id));

        let updated = match phase {
            ReviewPhase::Day1 => diesel::update(target)
                .set(study_records::reviewed_24h.eq(true))
                .execute(conn)?,
            ReviewPhase::Day7 => diesel::update(target)
                .set(study_records::reviewed_07d.eq(true))
                .execute(conn)?,
            ReviewPhase::Day15 => diesel::update(target)
                .set(study_records::reviewed_15d.eq(true))
                .execute(conn)?,
            ReviewPhase::Day30 => diesel::update(target)
                .set(study_records::reviewed_30d.eq(true))
                .execute(conn)?,
        };
        Ok(updated > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::bootstrap::test_connection;
    use crate::data::repositories::{MissionRepository, UserRepository};
    use chrono::NaiveDate;

    struct Fixture {
        conn: SqliteConnection,
        user_id: i32,
        mission_id: i32,
    }

    fn fixture() -> Fixture {
        let mut conn = test_connection();
        let user = UserRepository::create_user(&mut conn, "ana@example.com", "h").unwrap();
        let mission = MissionRepository::create(&mut conn, user.user_id, "TRF", None).unwrap();
        Fixture {
            conn,
            user_id: user.user_id,
            mission_id: mission.mission_id,
        }
    }

    fn date(day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 4, day)
    }

    #[test]
    fn insert_stores_accuracy_and_default_flags() {
        let mut f = fixture();
        let new = NewStudyRecord::new(f.user_id, f.mission_id, date(3), "Direito Penal", "Crimes contra a vida", 13, 20);
        let record = StudyRecordRepository::insert(&mut f.conn, &new).unwrap();

        assert_eq!(record.accuracy_rate, Some(65.0));
        assert_eq!(record.study_date, date(3));
        assert!(!record.reviewed_24h && !record.reviewed_07d && !record.reviewed_15d && !record.reviewed_30d);
    }

    #[test]
    fn list_is_scoped_and_most_recent_first() {
        let mut f = fixture();
        let other = MissionRepository::create(&mut f.conn, f.user_id, "TRT", None).unwrap();

        for (day, mission_id) in [(1, f.mission_id), (9, f.mission_id), (5, f.mission_id), (7, other.mission_id)] {
            let new = NewStudyRecord::new(f.user_id, mission_id, date(day), "Português", "Crase", 1, 2);
            StudyRecordRepository::insert(&mut f.conn, &new).unwrap();
        }

        let records = StudyRecordRepository::list_for_mission(&mut f.conn, f.user_id, f.mission_id).unwrap();
        let dates: Vec<Option<NaiveDate>> = records.iter().map(|r| r.study_date).collect();
        assert_eq!(dates, vec![date(9), date(5), date(1)]);
    }

    #[test]
    fn mark_reviewed_only_sets_named_flag_and_keeps_accuracy() {
        let mut f = fixture();
        let new = NewStudyRecord::new(f.user_id, f.mission_id, date(1), "Matemática", "Juros", 7, 9);
        let record = StudyRecordRepository::insert(&mut f.conn, &new).unwrap();

        assert!(StudyRecordRepository::mark_reviewed(&mut f.conn, f.user_id, record.record_id, ReviewPhase::Day7).unwrap());
        // Marking again is a no-op on the flag but still matches the row
        assert!(StudyRecordRepository::mark_reviewed(&mut f.conn, f.user_id, record.record_id, ReviewPhase::Day7).unwrap());

        let updated = StudyRecordRepository::find_owned(&mut f.conn, f.user_id, record.record_id)
            .unwrap()
            .expect("record");
        assert!(updated.reviewed_07d);
        assert!(!updated.reviewed_24h);
        assert!(!updated.reviewed_15d);
        assert!(!updated.reviewed_30d);
        assert_eq!(updated.accuracy_rate, record.accuracy_rate);
        assert_eq!(updated.correct_count, 7);
    }

    #[test]
    fn other_users_cannot_touch_records() {
        let mut f = fixture();
        let intruder = UserRepository::create_user(&mut f.conn, "eve@example.com", "h").unwrap();
        let new = NewStudyRecord::new(f.user_id, f.mission_id, date(1), "Matemática", "Juros", 7, 9);
        let record = StudyRecordRepository::insert(&mut f.conn, &new).unwrap();

        assert!(!StudyRecordRepository::mark_reviewed(&mut f.conn, intruder.user_id, record.record_id, ReviewPhase::Day1).unwrap());
        assert!(!StudyRecordRepository::delete(&mut f.conn, intruder.user_id, record.record_id).unwrap());
        assert!(StudyRecordRepository::delete(&mut f.conn, f.user_id, record.record_id).unwrap());
        assert!(StudyRecordRepository::find_owned(&mut f.conn, f.user_id, record.record_id).unwrap().is_none());
    }
}
