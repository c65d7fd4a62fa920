use axum::Router;

use crate::AppState;

pub mod login;
pub mod register;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(login::router())
        .merge(register::router())
}
