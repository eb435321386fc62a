//! Competition handler implementations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    handlers::MessageResponse,
    middleware::auth::AuthenticatedUser,
    models::Competition,
    services::CompetitionService,
    state::AppState,
};

use super::request::{CreateCompetitionRequest, UpdateCompetitionRequest};

/// GET /competitions
pub async fn list_competitions(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> AppResult<Json<Vec<Competition>>> {
    let competitions = CompetitionService::list_competitions(state.db()).await?;
    Ok(Json(competitions))
}

/// POST /competitions
pub async fn create_competition(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateCompetitionRequest>,
) -> AppResult<(StatusCode, Json<Competition>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let competition = CompetitionService::create_competition(state.db(), &user, payload).await?;
    Ok((StatusCode::CREATED, Json(competition)))
}

/// GET /competitions/{id}
pub async fn get_competition(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Competition>> {
    let competition = CompetitionService::get_competition(state.db(), id).await?;
    Ok(Json(competition))
}

/// PUT /competitions/{id}
pub async fn update_competition(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCompetitionRequest>,
) -> AppResult<Json<Competition>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let competition =
        CompetitionService::update_competition(state.db(), &user, id, payload).await?;
    Ok(Json(competition))
}

/// DELETE /competitions/{id}
pub async fn delete_competition(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    CompetitionService::delete_competition(state.db(), &user, id).await?;
    Ok(Json(MessageResponse::new("Competition deleted successfully")))
}
