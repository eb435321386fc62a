//! Event service
//!
//! Event CRUD plus roster management: the chief-judge/judge/contestant
//! assignment relations and the judge→contestant restriction the scoring
//! paths are gated on.

use sqlx::PgPool;

use crate::{
    db::repositories::{CompetitionRepository, EventRepository, UserRepository},
    error::{AppError, AppResult},
    handlers::events::request::CreateEventRequest,
    middleware::auth::AuthenticatedUser,
    models::{Event, UserRole, UserSummary},
    services::PermissionService,
};

/// Event service for business logic
pub struct EventService;

impl EventService {
    /// Create a new event (admin only)
    pub async fn create_event(
        pool: &PgPool,
        user: &AuthenticatedUser,
        payload: CreateEventRequest,
    ) -> AppResult<Event> {
        PermissionService::require_roles(user, &[UserRole::Admin])?;

        CompetitionRepository::find_by_id(pool, payload.competition_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Competition not found".to_string()))?;

        EventRepository::create(
            pool,
            payload.competition_id,
            &payload.name,
            payload.description.as_deref(),
        )
        .await
    }

    /// List events visible to the user
    pub async fn list_events(
        pool: &PgPool,
        user: &AuthenticatedUser,
        competition_id: Option<i64>,
    ) -> AppResult<Vec<Event>> {
        EventRepository::list_visible(pool, user.id, user.role, competition_id).await
    }

    /// Get event by ID
    pub async fn get_event(pool: &PgPool, user: &AuthenticatedUser, id: i64) -> AppResult<Event> {
        let event = EventRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        PermissionService::require_event_access(pool, user, id).await?;

        Ok(event)
    }

    /// Delete event (admin only)
    pub async fn delete_event(pool: &PgPool, user: &AuthenticatedUser, id: i64) -> AppResult<()> {
        PermissionService::require_roles(user, &[UserRole::Admin])?;

        if !EventRepository::delete(pool, id).await? {
            return Err(AppError::NotFound("Event not found".to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // Rosters
    // =========================================================================

    /// Add a user to one of the event's role rosters (admin only).
    ///
    /// The target user must exist and actually hold the roster's role.
    pub async fn add_to_roster(
        pool: &PgPool,
        user: &AuthenticatedUser,
        event_id: i64,
        target_user_id: i64,
        roster_role: UserRole,
    ) -> AppResult<()> {
        PermissionService::require_roles(user, &[UserRole::Admin])?;

        EventRepository::find_by_id(pool, event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        let target_role = UserRepository::find_role(pool, target_user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        if target_role != roster_role {
            return Err(AppError::InvalidInput(format!(
                "User does not have the {roster_role} role"
            )));
        }

        match roster_role {
            UserRole::ChiefJudge => {
                EventRepository::add_chief_judge(pool, event_id, target_user_id).await
            }
            UserRole::Judge => EventRepository::add_judge(pool, event_id, target_user_id).await,
            UserRole::Contestant => {
                EventRepository::add_contestant(pool, event_id, target_user_id).await
            }
            UserRole::Admin => Err(AppError::InvalidInput(
                "Admins are not assigned to events".to_string(),
            )),
        }
    }

    /// Restrict a judge to a contestant within the event (admin/chief-judge).
    pub async fn assign_contestant_to_judge(
        pool: &PgPool,
        user: &AuthenticatedUser,
        event_id: i64,
        judge_id: i64,
        contestant_id: i64,
    ) -> AppResult<()> {
        PermissionService::require_roles(user, &[UserRole::Admin, UserRole::ChiefJudge])?;
        PermissionService::require_event_access(pool, user, event_id).await?;

        // Both sides must already be on the event's rosters.
        if !EventRepository::has_judge(pool, event_id, judge_id).await? {
            return Err(AppError::InvalidInput(
                "Judge is not assigned to this event".to_string(),
            ));
        }
        if !EventRepository::has_contestant(pool, event_id, contestant_id).await? {
            return Err(AppError::InvalidInput(
                "Contestant is not assigned to this event".to_string(),
            ));
        }

        EventRepository::assign_contestant_to_judge(pool, event_id, judge_id, contestant_id).await
    }

    /// Contestant roster of the event.
    ///
    /// Judges only see contestants assigned to them; contestants are not
    /// shown the roster at all.
    pub async fn list_contestants(
        pool: &PgPool,
        user: &AuthenticatedUser,
        event_id: i64,
    ) -> AppResult<Vec<UserSummary>> {
        PermissionService::require_roles(
            user,
            &[UserRole::Admin, UserRole::ChiefJudge, UserRole::Judge],
        )?;
        PermissionService::require_event_access(pool, user, event_id).await?;

        match user.role {
            UserRole::Judge => EventRepository::assigned_contestants(pool, event_id, user.id).await,
            _ => EventRepository::contestants(pool, event_id).await,
        }
    }
}
