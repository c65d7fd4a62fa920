pub mod auth;
pub mod dashboard;
pub mod missions;
pub mod records;
pub mod syllabus;
