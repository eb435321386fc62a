//! Module management handlers

mod handler;
pub mod request;
pub mod response;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

/// Module routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_modules))
        .route("/", post(handler::create_module))
        .route("/{id}", get(handler::get_module))
        .route("/{id}", put(handler::update_module))
        .route("/{id}", delete(handler::delete_module))
        // Lifecycle
        .route("/{id}/status", put(handler::update_module_status))
        // Evaluation triggers
        .route("/{id}/evaluate", post(handler::trigger_module_evaluation))
        .route(
            "/{id}/contestants/{contestant_id}/evaluate",
            post(handler::trigger_contestant_evaluation),
        )
}
