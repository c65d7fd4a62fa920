use axum::{
    extract::{Form, State},
    response::{Html, Redirect},
    routing::get,
    Router,
};
use tera::Context;
use tower_sessions::Session;

use crate::{
    AppState,
    utils::{set_user_session, render_template},
    data::repositories::UserRepository,
};
use crate::data::models::{LoginError, LoginForm};

pub async fn show_login_form(State(state): State<AppState>) -> Html<String> {
    let mut context = Context::new();
    context.insert("title", "Login");
    render_template(&state.templates, "login.html", context)
}

#[axum::debug_handler]
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, LoginError> {
    let mut conn = state.pool.get()
        .map_err(|e| {
            log::error!("Failed to get DB connection: {}", e);
            LoginError::SessionError("Failed to get DB connection".into())
        })?;

    let email = form.email.trim().to_lowercase();
    let user = UserRepository::find_by_email(&mut conn, &email)?;

    match user {
        Some(user) => {
            if UserRepository::verify_password(&user.password, &form.password)? {
                set_user_session(&session, user.user_id, &user.email).await?;
                log::info!("User logged in: {}", user.email);
                Ok(Redirect::to("/dashboard"))
            } else {
                log::warn!("Invalid password for user: {}", email);
                Err(LoginError::InvalidCredentials)
            }
        },
        None => {
            log::warn!("User not found: {}", email);
            Err(LoginError::InvalidCredentials)
        }
    }
}

pub async fn handle_logout(session: Session) -> Result<Redirect, LoginError> {
    session.delete().await.map_err(|e| {
        log::error!("Failed to delete session: {}", e);
        LoginError::SessionError("Failed to logout".into())
    })?;
    Ok(Redirect::to("/auth/login"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(show_login_form).post(handle_login))
        .route("/logout", get(handle_logout))
}
