pub mod mission;
pub mod study_record;
pub mod syllabus;
pub mod user;

pub use mission::MissionRepository;
pub use study_record::StudyRecordRepository;
pub use syllabus::SyllabusRepository;
pub use user::UserRepository;
