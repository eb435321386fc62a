//! Competition service

use sqlx::PgPool;

use crate::{
    db::repositories::CompetitionRepository,
    error::{AppError, AppResult},
    handlers::competitions::request::{CreateCompetitionRequest, UpdateCompetitionRequest},
    middleware::auth::AuthenticatedUser,
    models::{Competition, UserRole},
    services::PermissionService,
};

/// Competition service for business logic
pub struct CompetitionService;

impl CompetitionService {
    /// Create a new competition (admin only)
    pub async fn create_competition(
        pool: &PgPool,
        user: &AuthenticatedUser,
        payload: CreateCompetitionRequest,
    ) -> AppResult<Competition> {
        PermissionService::require_roles(user, &[UserRole::Admin])?;

        CompetitionRepository::create(pool, &payload.name, payload.description.as_deref()).await
    }

    /// List all competitions
    pub async fn list_competitions(pool: &PgPool) -> AppResult<Vec<Competition>> {
        CompetitionRepository::list(pool).await
    }

    /// Get competition by ID
    pub async fn get_competition(pool: &PgPool, id: i64) -> AppResult<Competition> {
        CompetitionRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Competition not found".to_string()))
    }

    /// Update competition (admin only)
    pub async fn update_competition(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: i64,
        payload: UpdateCompetitionRequest,
    ) -> AppResult<Competition> {
        PermissionService::require_roles(user, &[UserRole::Admin])?;

        CompetitionRepository::update(pool, id, payload.name.as_deref(), payload.description.as_deref())
            .await?
            .ok_or_else(|| AppError::NotFound("Competition not found".to_string()))
    }

    /// Delete competition (admin only)
    pub async fn delete_competition(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: i64,
    ) -> AppResult<()> {
        PermissionService::require_roles(user, &[UserRole::Admin])?;

        if !CompetitionRepository::delete(pool, id).await? {
            return Err(AppError::NotFound("Competition not found".to_string()));
        }
        Ok(())
    }
}
