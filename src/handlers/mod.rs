//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod attachments;
pub mod competitions;
pub mod events;
pub mod health;
pub mod modules;
pub mod scoring;

use axum::{middleware, Router};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Create all API routes
pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/competitions", competitions::routes())
        .nest("/events", events::routes())
        .nest("/modules", modules::routes())
        .nest("/scoring", scoring::routes())
        .nest("/attachments", attachments::routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().merge(health::routes()).merge(protected)
}

/// Generic message payload
#[derive(Debug, serde::Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
