use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Router,
};
use chrono::Local;
use diesel::SqliteConnection;
use tower_sessions::Session;
use validator::Validate;

use crate::{
    AppState,
    data::models::{ApiError, ApiResponse, LogStudyRequest, NewStudyRecord, StudyRecord},
    data::repositories::StudyRecordRepository,
    features::cache::CacheKey,
    features::pendencies::ReviewPhase,
    utils::{normalize_label, StudyContext},
};

/// A mission's records, served from the cache when fresh.
pub fn cached_records(
    state: &AppState,
    conn: &mut SqliteConnection,
    user_id: i32,
    mission_id: i32,
) -> Result<Arc<Vec<StudyRecord>>, ApiError> {
    let key = CacheKey { user_id, mission_id };
    let generation = state.cache.generation(key);
    if let Some(records) = state.cache.get(key) {
        return Ok(records);
    }

    let records = StudyRecordRepository::list_for_mission(conn, user_id, mission_id)?;
    log::debug!("Loaded {} records for mission {}", records.len(), mission_id);
    Ok(state.cache.insert(key, generation, records))
}

pub async fn list_records(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<StudyRecord>>, ApiError> {
    let ctx = StudyContext::from_session(&session).await?;
    let mut conn = state.pool.get()?;
    let mission = ctx.active_mission(&session, &mut conn).await?;

    let records = cached_records(&state, &mut conn, ctx.user_id, mission.mission_id)?;
    Ok(Json(records.as_ref().clone()))
}

pub async fn create_record(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LogStudyRequest>,
) -> Result<(StatusCode, Json<StudyRecord>), ApiError> {
    let ctx = StudyContext::from_session(&session).await?;
    ctx.require_mission()?;
    payload.validate()?;

    let subject = normalize_label(&payload.subject);
    let topic = normalize_label(&payload.topic);
    if subject.is_empty() || topic.is_empty() {
        return Err(ApiError::ValidationError("Subject and topic are required".into()));
    }

    let mut conn = state.pool.get()?;
    let mission_id = ctx.active_mission(&session, &mut conn).await?.mission_id;

    let study_date = payload.study_date.unwrap_or_else(|| Local::now().date_naive());
    let new_record = NewStudyRecord::new(
        ctx.user_id,
        mission_id,
        Some(study_date),
        &subject,
        &topic,
        payload.correct_count,
        payload.total_count,
    );

    let record = StudyRecordRepository::insert(&mut conn, &new_record)?;
    state.cache.invalidate(CacheKey { user_id: ctx.user_id, mission_id });

    log::info!("User {} logged study record {}", ctx.user_id, record.record_id);
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn delete_record(
    State(state): State<AppState>,
    session: Session,
    Path(record_id): Path<i32>,
) -> Result<Json<ApiResponse>, ApiError> {
    let ctx = StudyContext::from_session(&session).await?;
    let mut conn = state.pool.get()?;

    let record = StudyRecordRepository::find_owned(&mut conn, ctx.user_id, record_id)?
        .ok_or(ApiError::NotFound("Study record"))?;
    StudyRecordRepository::delete(&mut conn, ctx.user_id, record_id)?;
    state.cache.invalidate(CacheKey { user_id: ctx.user_id, mission_id: record.mission_id });

    Ok(Json(ApiResponse::ok("Study record deleted successfully")))
}

pub async fn mark_review(
    State(state): State<AppState>,
    session: Session,
    Path((record_id, phase_code)): Path<(i32, String)>,
) -> Result<Json<ApiResponse>, ApiError> {
    let ctx = StudyContext::from_session(&session).await?;
    let phase = ReviewPhase::from_code(&phase_code)
        .ok_or_else(|| ApiError::ValidationError(format!("Unknown review phase: {}", phase_code)))?;

    let mut conn = state.pool.get()?;
    let record = StudyRecordRepository::find_owned(&mut conn, ctx.user_id, record_id)?
        .ok_or(ApiError::NotFound("Study record"))?;

    StudyRecordRepository::mark_reviewed(&mut conn, ctx.user_id, record_id, phase)?;
    state.cache.invalidate(CacheKey { user_id: ctx.user_id, mission_id: record.mission_id });

    Ok(Json(ApiResponse::ok(format!("Review {} done", phase.label()))))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/{record_id}", delete(delete_record))
        .route("/{record_id}/reviews/{phase}", post(mark_review))
}
