use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::CustomizeConnection;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS missions (
    mission_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    user_id INTEGER NOT NULL REFERENCES users(user_id),
    name TEXT NOT NULL,
    exam_date DATE,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS subjects (
    subject_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    mission_id INTEGER NOT NULL REFERENCES missions(mission_id),
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS topics (
    topic_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    subject_id INTEGER NOT NULL REFERENCES subjects(subject_id),
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS study_records (
    record_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    user_id INTEGER NOT NULL REFERENCES users(user_id),
    mission_id INTEGER NOT NULL REFERENCES missions(mission_id),
    study_date DATE,
    subject TEXT NOT NULL,
    topic TEXT NOT NULL,
    correct_count INTEGER NOT NULL,
    total_count INTEGER NOT NULL,
    accuracy_rate DOUBLE,
    reviewed_24h BOOLEAN NOT NULL DEFAULT 0,
    reviewed_07d BOOLEAN NOT NULL DEFAULT 0,
    reviewed_15d BOOLEAN NOT NULL DEFAULT 0,
    reviewed_30d BOOLEAN NOT NULL DEFAULT 0,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_study_records_scope
    ON study_records (user_id, mission_id);
"#;

/// Creates every table the app needs. Safe to run on each startup.
pub fn init_schema(conn: &mut SqliteConnection) -> Result<(), diesel::result::Error> {
    conn.batch_execute(SCHEMA_SQL)
}

/// SQLite only enforces `REFERENCES` clauses on connections that opt in.
pub fn enable_foreign_keys(conn: &mut SqliteConnection) -> Result<(), diesel::result::Error> {
    conn.batch_execute("PRAGMA foreign_keys = ON;")
}

/// Turns foreign key checks on for every connection the pool hands out.
#[derive(Debug, Clone, Copy)]
pub struct ForeignKeys;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ForeignKeys {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        enable_foreign_keys(conn).map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Fresh in-memory database with the schema applied, for repository tests.
#[cfg(test)]
pub fn test_connection() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:").expect("in-memory sqlite");
    enable_foreign_keys(&mut conn).expect("foreign keys");
    init_schema(&mut conn).expect("schema");
    conn
}
