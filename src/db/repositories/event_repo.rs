//! Event repository
//!
//! Events own the three role-scoped rosters (chief judges, judges,
//! contestants) and the judge→contestant assignment relation consulted by the
//! permission oracle.

use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{Event, UserRole, UserSummary},
};

/// Repository for event and roster database operations
pub struct EventRepository;

impl EventRepository {
    /// Create a new event
    pub async fn create(
        pool: &PgPool,
        competition_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (competition_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(competition_id)
        .bind(name)
        .bind(description)
        .fetch_one(pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(r#"SELECT * FROM events WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(event)
    }

    /// List events visible to the user, optionally scoped to one competition.
    ///
    /// Admins see everything; other roles only see events they are assigned
    /// to through their role's roster relation.
    pub async fn list_visible(
        pool: &PgPool,
        user_id: i64,
        role: UserRole,
        competition_id: Option<i64>,
    ) -> AppResult<Vec<Event>> {
        let role_filter = match role {
            UserRole::Admin => "TRUE",
            UserRole::ChiefJudge => {
                "e.id IN (SELECT event_id FROM event_chief_judges WHERE chief_judge_id = $1)"
            }
            UserRole::Judge => "e.id IN (SELECT event_id FROM event_judges WHERE judge_id = $1)",
            UserRole::Contestant => {
                "e.id IN (SELECT event_id FROM event_contestants WHERE contestant_id = $1)"
            }
        };

        let query = format!(
            "SELECT e.* FROM events e
             WHERE {role_filter}
               AND ($2::BIGINT IS NULL OR e.competition_id = $2)
               AND $1::BIGINT IS NOT NULL
             ORDER BY e.created_at"
        );

        let events = sqlx::query_as::<_, Event>(&query)
            .bind(user_id)
            .bind(competition_id)
            .fetch_all(pool)
            .await?;

        Ok(events)
    }

    /// Delete event (cascades to modules and rosters)
    pub async fn delete(pool: &PgPool, id: i64) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM events WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Rosters
    // =========================================================================

    /// Add a chief judge to the event roster (idempotent)
    pub async fn add_chief_judge(pool: &PgPool, event_id: i64, user_id: i64) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO event_chief_judges (event_id, chief_judge_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Add a judge to the event roster (idempotent)
    pub async fn add_judge(pool: &PgPool, event_id: i64, user_id: i64) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO event_judges (event_id, judge_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Add a contestant to the event roster (idempotent)
    pub async fn add_contestant(pool: &PgPool, event_id: i64, user_id: i64) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO event_contestants (event_id, contestant_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Restrict a judge to a contestant within the event (idempotent)
    pub async fn assign_contestant_to_judge(
        pool: &PgPool,
        event_id: i64,
        judge_id: i64,
        contestant_id: i64,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO judge_contestant_assignments (event_id, judge_id, contestant_id)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(judge_id)
        .bind(contestant_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    // =========================================================================
    // Membership checks (permission oracle)
    // =========================================================================

    /// Whether the user is a chief judge of the event
    pub async fn has_chief_judge(pool: &PgPool, event_id: i64, user_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM event_chief_judges
                WHERE event_id = $1 AND chief_judge_id = $2
            )
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Whether the user is a judge of the event
    pub async fn has_judge(pool: &PgPool, event_id: i64, user_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM event_judges
                WHERE event_id = $1 AND judge_id = $2
            )
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Whether the user is a contestant of the event
    pub async fn has_contestant(pool: &PgPool, event_id: i64, user_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM event_contestants
                WHERE event_id = $1 AND contestant_id = $2
            )
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Whether the judge is assigned to the contestant within the event
    pub async fn has_judge_contestant_assignment(
        pool: &PgPool,
        event_id: i64,
        judge_id: i64,
        contestant_id: i64,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM judge_contestant_assignments
                WHERE event_id = $1 AND judge_id = $2 AND contestant_id = $3
            )
            "#,
        )
        .bind(event_id)
        .bind(judge_id)
        .bind(contestant_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    // =========================================================================
    // Roster queries
    // =========================================================================

    /// Full contestant roster of the event, ordered by display name
    pub async fn contestants(pool: &PgPool, event_id: i64) -> AppResult<Vec<UserSummary>> {
        let contestants = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.username, u.name
            FROM users u
            JOIN event_contestants ec ON u.id = ec.contestant_id
            WHERE ec.event_id = $1
            ORDER BY u.name
            "#,
        )
        .bind(event_id)
        .fetch_all(pool)
        .await?;

        Ok(contestants)
    }

    /// Contestants of the event assigned to the given judge
    pub async fn assigned_contestants(
        pool: &PgPool,
        event_id: i64,
        judge_id: i64,
    ) -> AppResult<Vec<UserSummary>> {
        let contestants = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.username, u.name
            FROM users u
            JOIN event_contestants ec ON u.id = ec.contestant_id
            JOIN judge_contestant_assignments jca
              ON jca.event_id = ec.event_id AND jca.contestant_id = u.id
            WHERE ec.event_id = $1 AND jca.judge_id = $2
            ORDER BY u.name
            "#,
        )
        .bind(event_id)
        .bind(judge_id)
        .fetch_all(pool)
        .await?;

        Ok(contestants)
    }

    /// Ids of every contestant assigned to the event
    pub async fn contestant_ids(pool: &PgPool, event_id: i64) -> AppResult<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT contestant_id FROM event_contestants
            WHERE event_id = $1
            ORDER BY contestant_id
            "#,
        )
        .bind(event_id)
        .fetch_all(pool)
        .await?;

        Ok(ids)
    }
}
