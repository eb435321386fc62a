//! Module handler implementations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    handlers::MessageResponse,
    middleware::auth::AuthenticatedUser,
    models::Module,
    services::ModuleService,
    state::AppState,
};

use super::{
    request::{
        CreateModuleRequest, ListModulesQuery, UpdateModuleRequest, UpdateModuleStatusRequest,
    },
    response::ModuleDetailResponse,
};

/// GET /modules
pub async fn list_modules(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListModulesQuery>,
) -> AppResult<Json<Vec<Module>>> {
    let modules = ModuleService::list_modules(state.db(), &user, query.event_id).await?;
    Ok(Json(modules))
}

/// GET /modules/{id}
pub async fn get_module(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ModuleDetailResponse>> {
    let detail = ModuleService::get_module(state.db(), &user, id).await?;
    Ok(Json(detail))
}

/// POST /modules
pub async fn create_module(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateModuleRequest>,
) -> AppResult<(StatusCode, Json<Module>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let module = ModuleService::create_module(state.db(), &user, payload).await?;
    Ok((StatusCode::CREATED, Json(module)))
}

/// PUT /modules/{id}
pub async fn update_module(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateModuleRequest>,
) -> AppResult<Json<Module>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let module = ModuleService::update_module(state.db(), &user, id, payload).await?;
    Ok(Json(module))
}

/// DELETE /modules/{id}
pub async fn delete_module(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    ModuleService::delete_module(state.db(), &user, id).await?;
    Ok(Json(MessageResponse::new("Module deleted successfully")))
}

/// PUT /modules/{id}/status
pub async fn update_module_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateModuleStatusRequest>,
) -> AppResult<Json<Module>> {
    let module = ModuleService::update_status(&state, &user, id, payload.status).await?;
    Ok(Json(module))
}

/// POST /modules/{id}/evaluate
///
/// Returns 202 immediately; the run proceeds as detached work.
pub async fn trigger_module_evaluation(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    ModuleService::trigger_module_evaluation(&state, &user, id).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new(
            "AI evaluation started, check back for results",
        )),
    ))
}

/// POST /modules/{id}/contestants/{contestant_id}/evaluate
pub async fn trigger_contestant_evaluation(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, contestant_id)): Path<(i64, i64)>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    ModuleService::trigger_contestant_evaluation(&state, &user, id, contestant_id).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new(
            "AI evaluation started, check back for results",
        )),
    ))
}
