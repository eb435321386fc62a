//! User repository

use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{user::User, UserRole},
};

/// Repository for the user mirror table
pub struct UserRepository;

impl UserRepository {
    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Role of a user, if the user exists
    pub async fn find_role(pool: &PgPool, id: i64) -> AppResult<Option<UserRole>> {
        let role: Option<UserRole> = sqlx::query_scalar(r#"SELECT role FROM users WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(role)
    }
}
