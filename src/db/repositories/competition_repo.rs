//! Competition repository

use sqlx::PgPool;

use crate::{error::AppResult, models::Competition};

/// Repository for competition database operations
pub struct CompetitionRepository;

impl CompetitionRepository {
    /// Create a new competition
    pub async fn create(
        pool: &PgPool,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<Competition> {
        let competition = sqlx::query_as::<_, Competition>(
            r#"
            INSERT INTO competitions (name, description)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(pool)
        .await?;

        Ok(competition)
    }

    /// Find competition by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<Competition>> {
        let competition =
            sqlx::query_as::<_, Competition>(r#"SELECT * FROM competitions WHERE id = $1"#)
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(competition)
    }

    /// List all competitions
    pub async fn list(pool: &PgPool) -> AppResult<Vec<Competition>> {
        let competitions =
            sqlx::query_as::<_, Competition>(r#"SELECT * FROM competitions ORDER BY created_at"#)
                .fetch_all(pool)
                .await?;

        Ok(competitions)
    }

    /// Update competition name/description
    pub async fn update(
        pool: &PgPool,
        id: i64,
        name: Option<&str>,
        description: Option<&str>,
    ) -> AppResult<Option<Competition>> {
        let competition = sqlx::query_as::<_, Competition>(
            r#"
            UPDATE competitions
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(pool)
        .await?;

        Ok(competition)
    }

    /// Delete competition (cascades to events and modules)
    pub async fn delete(pool: &PgPool, id: i64) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM competitions WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
