//! Scoring handler implementations

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
    models::{ScoringCriteria, ScoringCriteriaDetail, ScoringItem, ScoringItemResult},
    services::ScoringService,
    state::AppState,
};

use super::{
    request::{AddScoringItemRequest, UpdateJudgeScoreRequest, UpdateScoringItemRequest},
    response::ScoringRecordRow,
};

/// GET /scoring/modules/{module_id}/criteria
pub async fn get_criteria(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(module_id): Path<i64>,
) -> AppResult<Json<Option<ScoringCriteriaDetail>>> {
    let criteria = ScoringService::get_criteria(state.db(), &user, module_id).await?;
    Ok(Json(criteria))
}

/// POST /scoring/modules/{module_id}/criteria
pub async fn create_criteria(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(module_id): Path<i64>,
) -> AppResult<(StatusCode, Json<ScoringCriteria>)> {
    let criteria = ScoringService::create_criteria(state.db(), &user, module_id).await?;
    Ok((StatusCode::CREATED, Json(criteria)))
}

/// POST /scoring/criteria/{criteria_id}/items
pub async fn add_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(criteria_id): Path<i64>,
    Json(payload): Json<AddScoringItemRequest>,
) -> AppResult<(StatusCode, Json<ScoringItem>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let item = ScoringService::add_item(state.db(), &user, criteria_id, payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /scoring/items/{id}
pub async fn update_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateScoringItemRequest>,
) -> AppResult<Json<ScoringItem>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let item = ScoringService::update_item(state.db(), &user, id, payload).await?;
    Ok(Json(item))
}

/// DELETE /scoring/items/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    ScoringService::delete_item(state.db(), &user, id).await?;
    Ok(Json(MessageResponse::new("Scoring item deleted successfully")))
}

/// GET /scoring/modules/{module_id}/records
pub async fn get_scoring_records(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(module_id): Path<i64>,
) -> AppResult<Json<Vec<ScoringRecordRow>>> {
    let rows = ScoringService::get_scoring_records(state.db(), &user, module_id).await?;
    Ok(Json(rows))
}

/// GET /scoring/modules/{module_id}/records/{contestant_id}
pub async fn get_scoring_record(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((module_id, contestant_id)): Path<(i64, i64)>,
) -> AppResult<Json<ScoringRecordRow>> {
    let row =
        ScoringService::get_scoring_record(state.db(), &user, module_id, contestant_id).await?;
    Ok(Json(row))
}

/// PUT /scoring/modules/{module_id}/records/{contestant_id}/judge-score
pub async fn update_judge_score(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((module_id, contestant_id)): Path<(i64, i64)>,
    Json(payload): Json<UpdateJudgeScoreRequest>,
) -> AppResult<Json<ScoringItemResult>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let result =
        ScoringService::record_judge_score(state.db(), &user, module_id, contestant_id, payload)
            .await?;
    Ok(Json(result))
}
