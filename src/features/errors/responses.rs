use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use crate::data::models::{ApiError, LoginError, RegisterError};

fn error_response(status: StatusCode, message: String) -> Response {
    let body = json!({
        "error": message,
        "status": status.as_u16()
    });

    (status, axum::Json(body)).into_response()
}

/// Server-side failures are logged in full and reported without details.
fn internal(context: &str, detail: &dyn std::fmt::Display) -> Response {
    log::error!("{}: {}", context, detail);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        match self {
            LoginError::InvalidCredentials => error_response(StatusCode::UNAUTHORIZED, self.to_string()),
            LoginError::DatabaseError(e) => internal("Database error during login", &e),
            LoginError::HashingError(e) => internal("Password verification failed", &e),
            LoginError::SessionError(e) => internal("Session error during login", &e),
        }
    }
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        match self {
            RegisterError::EmailTaken => error_response(StatusCode::CONFLICT, self.to_string()),
            RegisterError::ValidationError(message) => error_response(StatusCode::BAD_REQUEST, message),
            RegisterError::DatabaseError(e) => internal("Database error during registration", &e),
            RegisterError::HashingError(e) => internal("Password hashing failed", &e),
            RegisterError::SessionError(e) => internal("Session error during registration", &e),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotLoggedIn => StatusCode::UNAUTHORIZED,
            ApiError::NoActiveMission | ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Duplicate(_) => StatusCode::CONFLICT,
            ApiError::DatabaseError(_) | ApiError::PoolError(_) | ApiError::SessionError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::DatabaseError(e) => internal("Database error", e),
            ApiError::PoolError(e) => internal("Failed to get DB connection", e),
            ApiError::SessionError(e) => internal("Session error", e),
            _ => error_response(self.status(), self.to_string()),
        }
    }
}
