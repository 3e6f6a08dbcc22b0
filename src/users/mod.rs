use axum::routing::{delete, get};
use axum::Router;

use crate::state::AppState;

mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::list_users))
        .route("/user", get(handlers::get_me).patch(handlers::update_me))
        .route("/delete", delete(handlers::delete_me))
        .route("/admin/delete", delete(handlers::admin_delete))
}
