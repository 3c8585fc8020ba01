use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

mod dto;
pub mod handlers;
pub mod repo;
mod services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(handlers::view_profile))
        .route("/profile/add", post(handlers::add_profile))
        .route("/profile/edit", post(handlers::edit_profile))
        .layer(DefaultBodyLimit::max(5 * 1024 * 1024)) // 5MB avatar cap
}
