//! Module repository

use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{Module, ModuleStatus, UserRole},
};

/// Repository for module database operations
pub struct ModuleRepository;

impl ModuleRepository {
    /// Create a new module in `pending` status
    pub async fn create(
        pool: &PgPool,
        event_id: i64,
        name: &str,
        duration_minutes: i32,
    ) -> AppResult<Module> {
        let module = sqlx::query_as::<_, Module>(
            r#"
            INSERT INTO modules (event_id, name, duration_minutes, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(name)
        .bind(duration_minutes)
        .fetch_one(pool)
        .await?;

        Ok(module)
    }

    /// Find module by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<Module>> {
        let module = sqlx::query_as::<_, Module>(r#"SELECT * FROM modules WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(module)
    }

    /// Event that owns the module, if the module exists
    pub async fn event_id_for_module(pool: &PgPool, module_id: i64) -> AppResult<Option<i64>> {
        let event_id: Option<i64> =
            sqlx::query_scalar(r#"SELECT event_id FROM modules WHERE id = $1"#)
                .bind(module_id)
                .fetch_optional(pool)
                .await?;

        Ok(event_id)
    }

    /// List modules visible to the user.
    ///
    /// Non-admin roles only see modules of events they are assigned to;
    /// contestants additionally never see `pending` modules.
    pub async fn list_visible(
        pool: &PgPool,
        user_id: i64,
        role: UserRole,
        event_id: Option<i64>,
    ) -> AppResult<Vec<Module>> {
        let base = String::from("SELECT m.* FROM modules m");

        let mut query = match role {
            UserRole::Admin => base,
            UserRole::ChiefJudge => {
                base + " WHERE m.event_id IN (
                    SELECT event_id FROM event_chief_judges WHERE chief_judge_id = $1
                )"
            }
            UserRole::Judge => {
                base + " WHERE m.event_id IN (
                    SELECT event_id FROM event_judges WHERE judge_id = $1
                )"
            }
            UserRole::Contestant => {
                base + " WHERE m.event_id IN (
                    SELECT event_id FROM event_contestants WHERE contestant_id = $1
                ) AND m.status != 'pending'"
            }
        };

        if role == UserRole::Admin {
            query.push_str(" WHERE $1::BIGINT IS NOT NULL");
        }
        query.push_str(" AND ($2::BIGINT IS NULL OR m.event_id = $2)");
        query.push_str(" ORDER BY m.created_at");

        let modules = sqlx::query_as::<_, Module>(&query)
            .bind(user_id)
            .bind(event_id)
            .fetch_all(pool)
            .await?;

        Ok(modules)
    }

    /// Update module name/duration
    pub async fn update(
        pool: &PgPool,
        id: i64,
        name: Option<&str>,
        duration_minutes: Option<i32>,
    ) -> AppResult<Option<Module>> {
        let module = sqlx::query_as::<_, Module>(
            r#"
            UPDATE modules
            SET name = COALESCE($2, name),
                duration_minutes = COALESCE($3, duration_minutes),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(duration_minutes)
        .fetch_optional(pool)
        .await?;

        Ok(module)
    }

    /// Flat status write; lifecycle side effects live in the service layer
    pub async fn update_status(
        pool: &PgPool,
        id: i64,
        status: ModuleStatus,
    ) -> AppResult<Option<Module>> {
        let module = sqlx::query_as::<_, Module>(
            r#"
            UPDATE modules
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(module)
    }

    /// Delete module (cascades to criteria, records and attachments)
    pub async fn delete(pool: &PgPool, id: i64) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM modules WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
