use crate::state::AppState;
use axum::{routing::get, Router};

pub mod artifact;
mod dto;
pub mod handlers;
pub mod registry;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/form/:brand",
        get(handlers::quote_form).post(handlers::quote_price),
    )
}
