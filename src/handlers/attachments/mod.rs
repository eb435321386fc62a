//! Attachment handlers

mod handler;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

/// Attachment routes
pub fn routes() -> Router<AppState> {
    Router::new()
        // Problem attachments
        .route("/modules/{module_id}/problems", post(handler::upload_problem))
        .route("/modules/{module_id}/problems", get(handler::list_problem_attachments))
        .route("/problems/{id}/download", get(handler::download_problem))
        .route("/problems/{id}", delete(handler::delete_problem))
        // Answer attachments
        .route("/modules/{module_id}/answers", post(handler::upload_answer))
        .route(
            "/modules/{module_id}/answers/{contestant_id}",
            get(handler::list_answer_attachments),
        )
        .route("/answers/{id}/download", get(handler::download_answer))
        .route("/answers/{id}", delete(handler::delete_answer))
}
