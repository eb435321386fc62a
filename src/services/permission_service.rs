//! Permission service
//!
//! The permission oracle: a user has access to an event iff their role's
//! assignment relation links them to it, with admin as an unconditional
//! pass. A missing assignment row is an ordinary `false`, never an error.
//! Sub-resource visibility (attachments, criteria, pending modules) is
//! layered on top by the owning services with the same policy.

use sqlx::PgPool;

use crate::{
    db::repositories::EventRepository,
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    models::UserRole,
};

/// Permission oracle for event-scoped access decisions
pub struct PermissionService;

impl PermissionService {
    /// Whether the user may access the event at all.
    pub async fn has_event_access(
        pool: &PgPool,
        user_id: i64,
        event_id: i64,
        role: UserRole,
    ) -> AppResult<bool> {
        match role {
            UserRole::Admin => Ok(true),
            UserRole::ChiefJudge => EventRepository::has_chief_judge(pool, event_id, user_id).await,
            UserRole::Judge => EventRepository::has_judge(pool, event_id, user_id).await,
            UserRole::Contestant => EventRepository::has_contestant(pool, event_id, user_id).await,
        }
    }

    /// Error-on-deny wrapper around [`Self::has_event_access`].
    pub async fn require_event_access(
        pool: &PgPool,
        user: &AuthenticatedUser,
        event_id: i64,
    ) -> AppResult<()> {
        if Self::has_event_access(pool, user.id, event_id, user.role).await? {
            Ok(())
        } else {
            Err(AppError::Forbidden("Access denied".to_string()))
        }
    }

    /// Whether the judge is assigned to the contestant within the event.
    pub async fn has_contestant_access(
        pool: &PgPool,
        event_id: i64,
        judge_id: i64,
        contestant_id: i64,
    ) -> AppResult<bool> {
        EventRepository::has_judge_contestant_assignment(pool, event_id, judge_id, contestant_id)
            .await
    }

    /// Judges may only address contestants assigned to them; other roles are
    /// not restricted by this check.
    pub async fn require_contestant_access(
        pool: &PgPool,
        user: &AuthenticatedUser,
        event_id: i64,
        contestant_id: i64,
    ) -> AppResult<()> {
        if user.role != UserRole::Judge {
            return Ok(());
        }
        if Self::has_contestant_access(pool, event_id, user.id, contestant_id).await? {
            Ok(())
        } else {
            Err(AppError::Forbidden("Access denied".to_string()))
        }
    }

    /// Role gate for operations restricted to specific roles.
    pub fn require_roles(user: &AuthenticatedUser, allowed: &[UserRole]) -> AppResult<()> {
        if allowed.contains(&user.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden("Access denied".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            id: 1,
            username: "u".to_string(),
            name: "U".to_string(),
            role,
        }
    }

    /// A lazy pool never connects; the admin path must decide without I/O.
    #[tokio::test]
    async fn admin_passes_without_touching_the_database() {
        let pool = PgPool::connect_lazy("postgres://localhost:1/unreachable").unwrap();
        assert!(
            PermissionService::has_event_access(&pool, 1, 99, UserRole::Admin)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn non_judges_skip_the_assignment_gate() {
        let pool = PgPool::connect_lazy("postgres://localhost:1/unreachable").unwrap();
        PermissionService::require_contestant_access(&pool, &user(UserRole::Admin), 1, 2)
            .await
            .unwrap();
        PermissionService::require_contestant_access(&pool, &user(UserRole::ChiefJudge), 1, 2)
            .await
            .unwrap();
    }

    #[test]
    fn role_gate_matches_allowed_list() {
        assert!(PermissionService::require_roles(
            &user(UserRole::ChiefJudge),
            &[UserRole::Admin, UserRole::ChiefJudge]
        )
        .is_ok());
        assert!(PermissionService::require_roles(
            &user(UserRole::Contestant),
            &[UserRole::Admin, UserRole::ChiefJudge]
        )
        .is_err());
    }
}
