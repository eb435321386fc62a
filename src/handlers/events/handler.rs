//! Event handler implementations

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
    models::{Event, UserRole, UserSummary},
    services::EventService,
    state::AppState,
};

use super::request::{AssignContestantRequest, CreateEventRequest, ListEventsQuery, RosterRequest};

/// GET /events
pub async fn list_events(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListEventsQuery>,
) -> AppResult<Json<Vec<Event>>> {
    let events = EventService::list_events(state.db(), &user, query.competition_id).await?;
    Ok(Json(events))
}

/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<Event>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let event = EventService::create_event(state.db(), &user, payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Event>> {
    let event = EventService::get_event(state.db(), &user, id).await?;
    Ok(Json(event))
}

/// DELETE /events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    EventService::delete_event(state.db(), &user, id).await?;
    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

/// POST /events/{id}/chief-judges
pub async fn add_chief_judge(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<RosterRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    EventService::add_to_roster(state.db(), &user, id, payload.user_id, UserRole::ChiefJudge)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Chief judge assigned to event")),
    ))
}

/// POST /events/{id}/judges
pub async fn add_judge(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<RosterRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    EventService::add_to_roster(state.db(), &user, id, payload.user_id, UserRole::Judge).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Judge assigned to event")),
    ))
}

/// POST /events/{id}/contestants
pub async fn add_contestant(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<RosterRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    EventService::add_to_roster(state.db(), &user, id, payload.user_id, UserRole::Contestant)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Contestant assigned to event")),
    ))
}

/// GET /events/{id}/contestants
pub async fn list_contestants(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<UserSummary>>> {
    let contestants = EventService::list_contestants(state.db(), &user, id).await?;
    Ok(Json(contestants))
}

/// POST /events/{id}/judges/{judge_id}/contestants
pub async fn assign_contestant_to_judge(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, judge_id)): Path<(i64, i64)>,
    Json(payload): Json<AssignContestantRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    EventService::assign_contestant_to_judge(
        state.db(),
        &user,
        id,
        judge_id,
        payload.contestant_id,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Contestant assigned to judge")),
    ))
}
