//! Scoring handlers

mod handler;
pub mod request;
pub mod response;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

/// Scoring routes
pub fn routes() -> Router<AppState> {
    Router::new()
        // Criteria
        .route("/modules/{module_id}/criteria", get(handler::get_criteria))
        .route("/modules/{module_id}/criteria", post(handler::create_criteria))
        .route("/criteria/{criteria_id}/items", post(handler::add_item))
        .route("/items/{id}", put(handler::update_item))
        .route("/items/{id}", delete(handler::delete_item))
        // Records
        .route("/modules/{module_id}/records", get(handler::get_scoring_records))
        .route(
            "/modules/{module_id}/records/{contestant_id}",
            get(handler::get_scoring_record),
        )
        .route(
            "/modules/{module_id}/records/{contestant_id}/judge-score",
            put(handler::update_judge_score),
        )
}
