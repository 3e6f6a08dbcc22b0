use axum::routing::post;
use axum::Router;

use crate::state::AppState;

pub mod claims;
pub mod cookies;
mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub(crate) mod validate;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
}
