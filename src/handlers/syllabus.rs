use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Router,
};
use tower_sessions::Session;
use validator::Validate;

use crate::{
    AppState,
    data::models::{
        ApiError, ApiResponse, CreateSubjectRequest, CreateTopicRequest, Subject,
        SubjectWithTopics, Topic,
    },
    data::repositories::SyllabusRepository,
    utils::{fold_label, normalize_label, StudyContext},
};

pub async fn get_syllabus(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<SubjectWithTopics>>, ApiError> {
    let ctx = StudyContext::from_session(&session).await?;
    let mut conn = state.pool.get()?;
    let mission = ctx.active_mission(&session, &mut conn).await?;

    Ok(Json(SyllabusRepository::load(&mut conn, mission.mission_id)?))
}

pub async fn create_subject(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<Subject>), ApiError> {
    let ctx = StudyContext::from_session(&session).await?;
    ctx.require_mission()?;
    payload.validate()?;

    let name = required_label(&payload.name, "Subject name is required")?;
    let mut conn = state.pool.get()?;
    let mission_id = ctx.active_mission(&session, &mut conn).await?.mission_id;

    let key = fold_label(&name);
    let existing = SyllabusRepository::subjects_for_mission(&mut conn, mission_id)?;
    if existing.iter().any(|subject| fold_label(&subject.name) == key) {
        return Err(ApiError::Duplicate("Subject"));
    }

    let subject = SyllabusRepository::add_subject(&mut conn, mission_id, &name)?;
    Ok((StatusCode::CREATED, Json(subject)))
}

pub async fn delete_subject(
    State(state): State<AppState>,
    session: Session,
    Path(subject_id): Path<i32>,
) -> Result<Json<ApiResponse>, ApiError> {
    let ctx = StudyContext::from_session(&session).await?;
    let mut conn = state.pool.get()?;

    SyllabusRepository::find_subject_owned(&mut conn, ctx.user_id, subject_id)?
        .ok_or(ApiError::NotFound("Subject"))?;
    SyllabusRepository::delete_subject(&mut conn, subject_id)?;

    Ok(Json(ApiResponse::ok("Subject deleted successfully")))
}

pub async fn create_topic(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateTopicRequest>,
) -> Result<(StatusCode, Json<Topic>), ApiError> {
    let ctx = StudyContext::from_session(&session).await?;
    payload.validate()?;

    let name = required_label(&payload.name, "Topic name is required")?;
    let mut conn = state.pool.get()?;

    SyllabusRepository::find_subject_owned(&mut conn, ctx.user_id, payload.subject_id)?
        .ok_or(ApiError::NotFound("Subject"))?;

    let key = fold_label(&name);
    let existing = SyllabusRepository::topics_for_subject(&mut conn, payload.subject_id)?;
    if existing.iter().any(|topic| fold_label(&topic.name) == key) {
        return Err(ApiError::Duplicate("Topic"));
    }

    let topic = SyllabusRepository::add_topic(&mut conn, payload.subject_id, &name)?;
    Ok((StatusCode::CREATED, Json(topic)))
}

pub async fn delete_topic(
    State(state): State<AppState>,
    session: Session,
    Path(topic_id): Path<i32>,
) -> Result<Json<ApiResponse>, ApiError> {
    let ctx = StudyContext::from_session(&session).await?;
    let mut conn = state.pool.get()?;

    SyllabusRepository::find_topic_owned(&mut conn, ctx.user_id, topic_id)?
        .ok_or(ApiError::NotFound("Topic"))?;
    SyllabusRepository::delete_topic(&mut conn, topic_id)?;

    Ok(Json(ApiResponse::ok("Topic deleted successfully")))
}

fn required_label(raw: &str, message: &str) -> Result<String, ApiError> {
    let name = normalize_label(raw);
    if name.is_empty() {
        return Err(ApiError::ValidationError(message.into()));
    }
    Ok(name)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_syllabus))
        .route("/subjects", post(create_subject))
        .route("/subjects/{subject_id}", delete(delete_subject))
        .route("/topics", post(create_topic))
        .route("/topics/{topic_id}", delete(delete_topic))
}
