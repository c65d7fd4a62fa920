use axum::{
    extract::{Form, State},
    response::{Html, Redirect},
    routing::get,
    Router,
};
use tera::Context;
use tower_sessions::Session;
use validator::Validate;

use crate::{
    AppState,
    utils::{set_user_session, render_template},
    data::repositories::UserRepository,
    data::models::{RegisterError, RegisterForm}
};

pub async fn show_register_form(State(state): State<AppState>) -> Html<String> {
    let mut context = Context::new();
    context.insert("title", "Register");
    render_template(&state.templates, "register.html", context)
}

#[axum::debug_handler]
pub async fn handle_register(
    State(state): State<AppState>,
    session: Session,
    Form(mut form): Form<RegisterForm>,
) -> Result<Redirect, RegisterError> {
    form.email = form.email.trim().to_lowercase();
    form.validate()?;

    let mut conn = state.pool.get()
        .map_err(|e| {
            log::error!("Failed to get DB connection: {}", e);
            RegisterError::SessionError("Failed to get DB connection".into())
        })?;

    if UserRepository::email_exists(&mut conn, &form.email)? {
        log::warn!("Registration attempt with existing email: {}", form.email);
        return Err(RegisterError::EmailTaken);
    }

    let password_hash = UserRepository::hash_password(&form.password, state.config.bcrypt_cost)?;
    let user = UserRepository::create_user(&mut conn, &form.email, &password_hash)
        .map_err(|e| {
            log::error!("User creation failed: {}", e);
            RegisterError::DatabaseError(e)
        })?;

    set_user_session(&session, user.user_id, &user.email).await?;

    log::info!("New user registered: {}", form.email);
    Ok(Redirect::to("/dashboard"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", get(show_register_form).post(handle_register))
}
