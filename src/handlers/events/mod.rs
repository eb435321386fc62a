//! Event and roster management handlers

mod handler;
pub mod request;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

/// Event routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_events))
        .route("/", post(handler::create_event))
        .route("/{id}", get(handler::get_event))
        .route("/{id}", delete(handler::delete_event))
        // Rosters
        .route("/{id}/chief-judges", post(handler::add_chief_judge))
        .route("/{id}/judges", post(handler::add_judge))
        .route("/{id}/contestants", post(handler::add_contestant))
        .route("/{id}/contestants", get(handler::list_contestants))
        .route(
            "/{id}/judges/{judge_id}/contestants",
            post(handler::assign_contestant_to_judge),
        )
}
