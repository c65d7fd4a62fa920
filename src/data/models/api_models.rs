use diesel::result::Error as DieselError;
use serde::Serialize;
use thiserror::Error;

/// Standard API response format
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Errors returned by the JSON API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("No active mission selected")]
    NoActiveMission,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0} already exists")]
    Duplicate(&'static str),
    #[error("Database error")]
    DatabaseError(#[from] DieselError),
    #[error("Database unavailable")]
    PoolError(#[from] r2d2::Error),
    #[error("Session error: {0}")]
    SessionError(String),
}
