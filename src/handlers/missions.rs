use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Router,
};
use serde::Serialize;
use tower_sessions::Session;
use validator::Validate;

use crate::{
    AppState,
    data::models::{ApiError, ApiResponse, CreateMissionRequest, Mission},
    data::repositories::MissionRepository,
    utils::{self, StudyContext},
};

#[derive(Serialize)]
pub struct MissionList {
    pub active_mission_id: Option<i32>,
    pub missions: Vec<Mission>,
}

pub async fn list_missions(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<MissionList>, ApiError> {
    let ctx = StudyContext::from_session(&session).await?;
    let mut conn = state.pool.get()?;

    let missions = MissionRepository::list_for_user(&mut conn, ctx.user_id)?;

    Ok(Json(MissionList {
        active_mission_id: ctx.mission_id,
        missions,
    }))
}

pub async fn create_mission(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateMissionRequest>,
) -> Result<(StatusCode, Json<Mission>), ApiError> {
    let ctx = StudyContext::from_session(&session).await?;
    payload.validate()?;

    let name = utils::normalize_label(&payload.name);
    if name.is_empty() {
        return Err(ApiError::ValidationError("Mission name is required".into()));
    }

    let mut conn = state.pool.get()?;
    let mission = MissionRepository::create(&mut conn, ctx.user_id, &name, payload.exam_date)?;
    log::info!("User {} created mission {}", ctx.user_id, mission.mission_id);

    // First mission becomes the active one
    if ctx.mission_id.is_none() {
        utils::set_active_mission(&session, mission.mission_id).await?;
    }

    Ok((StatusCode::CREATED, Json(mission)))
}

pub async fn delete_mission(
    State(state): State<AppState>,
    session: Session,
    Path(mission_id): Path<i32>,
) -> Result<Json<ApiResponse>, ApiError> {
    let ctx = StudyContext::from_session(&session).await?;
    let mut conn = state.pool.get()?;

    if !MissionRepository::delete(&mut conn, ctx.user_id, mission_id)? {
        return Err(ApiError::NotFound("Mission"));
    }
    state.cache.invalidate_mission(mission_id);

    if ctx.mission_id == Some(mission_id) {
        utils::clear_active_mission(&session).await?;
    }

    log::info!("User {} deleted mission {}", ctx.user_id, mission_id);
    Ok(Json(ApiResponse::ok("Mission deleted successfully")))
}

pub async fn select_mission(
    State(state): State<AppState>,
    session: Session,
    Path(mission_id): Path<i32>,
) -> Result<Json<ApiResponse>, ApiError> {
    let ctx = StudyContext::from_session(&session).await?;
    let mut conn = state.pool.get()?;

    let mission = MissionRepository::find_owned(&mut conn, ctx.user_id, mission_id)?
        .ok_or(ApiError::NotFound("Mission"))?;
    utils::set_active_mission(&session, mission.mission_id).await?;

    Ok(Json(ApiResponse::ok(format!("Active mission: {}", mission.name))))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_missions).post(create_mission))
        .route("/{mission_id}", delete(delete_mission))
        .route("/{mission_id}/select", post(select_mission))
}
