pub mod api_models;
pub mod auth_models;
pub mod mission_models;
pub mod study_models;
pub mod user_models;

pub use api_models::{ApiError, ApiResponse};
pub use auth_models::{LoginError, RegisterError, RegisterForm, LoginForm};
pub use mission_models::{
    Mission, NewMission, Subject, Topic, SubjectWithTopics,
    CreateMissionRequest, CreateSubjectRequest, CreateTopicRequest,
};
pub use study_models::{StudyRecord, NewStudyRecord, LogStudyRequest};
pub use user_models::{User, NewUser};
