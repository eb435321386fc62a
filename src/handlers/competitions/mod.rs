//! Competition management handlers

mod handler;
pub mod request;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

/// Competition routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_competitions))
        .route("/", post(handler::create_competition))
        .route("/{id}", get(handler::get_competition))
        .route("/{id}", put(handler::update_competition))
        .route("/{id}", delete(handler::delete_competition))
}
