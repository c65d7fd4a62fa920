use axum::{
    extract::{Json, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::{Local, NaiveDate};
use diesel::SqliteConnection;
use serde::Serialize;
use tera::Context;
use tower_sessions::Session;

use crate::{
    AppState,
    data::models::{ApiError, Mission, StudyRecord, SubjectWithTopics},
    data::repositories::{MissionRepository, SyllabusRepository},
    features::metrics::{summarize, MissionMetrics},
    features::pendencies::{calculate_pendencies, rank_by_urgency, PendencyEntry},
    handlers::records::cached_records,
    utils::{self, render_template, StudyContext},
};

const RECENT_RECORDS: usize = 10;

#[derive(Serialize)]
pub struct DashboardView {
    pub mission: Mission,
    pub metrics: MissionMetrics,
    pub pendencies: Vec<PendencyEntry>,
    pub recent_records: Vec<StudyRecord>,
}

/// Everything the dashboard shows for one mission, as of `today`.
fn build_dashboard(
    state: &AppState,
    conn: &mut SqliteConnection,
    mission: Mission,
    today: NaiveDate,
) -> Result<DashboardView, ApiError> {
    let records = cached_records(state, conn, mission.user_id, mission.mission_id)?;

    let mut pendencies = calculate_pendencies(&records, today);
    rank_by_urgency(&mut pendencies);

    Ok(DashboardView {
        mission,
        metrics: summarize(&records),
        pendencies,
        recent_records: records.iter().take(RECENT_RECORDS).cloned().collect(),
    })
}

pub async fn dashboard_api(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<DashboardView>, ApiError> {
    let ctx = StudyContext::from_session(&session).await?;
    let mut conn = state.pool.get()?;
    let mission = ctx.active_mission(&session, &mut conn).await?;

    let view = build_dashboard(&state, &mut conn, mission, Local::now().date_naive())?;
    Ok(Json(view))
}

pub async fn dashboard_page(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, ApiError> {
    let ctx = match StudyContext::from_session(&session).await {
        Ok(ctx) => ctx,
        Err(ApiError::NotLoggedIn) => return Ok(Redirect::to("/auth/login").into_response()),
        Err(e) => return Err(e),
    };

    let mut conn = state.pool.get()?;
    let missions = MissionRepository::list_for_user(&mut conn, ctx.user_id)?;

    let mut context = Context::new();
    context.insert("title", "Dashboard");
    context.insert("user_email", &utils::get_current_user_email(&session).await);
    context.insert("missions", &missions);

    if ctx.mission_id.is_some() {
        match ctx.active_mission(&session, &mut conn).await {
            Ok(mission) => {
                let syllabus: Vec<SubjectWithTopics> =
                    SyllabusRepository::load(&mut conn, mission.mission_id)?;
                let view = build_dashboard(&state, &mut conn, mission, Local::now().date_naive())?;
                context.insert("syllabus", &syllabus);
                context.insert("dashboard", &view);
            }
            // Stale selection was already cleared; show the mission picker
            Err(ApiError::NoActiveMission) => {}
            Err(e) => return Err(e),
        }
    }

    let page: Html<String> = render_template(&state.templates, "dashboard.html", context);
    Ok(page.into_response())
}
