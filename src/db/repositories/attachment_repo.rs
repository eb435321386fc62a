//! Attachment repository

use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{AnswerAttachment, ProblemAttachment},
};

/// Repository for problem and answer attachment rows
pub struct AttachmentRepository;

impl AttachmentRepository {
    // =========================================================================
    // Problem attachments
    // =========================================================================

    /// Record an uploaded problem attachment
    pub async fn insert_problem(
        pool: &PgPool,
        module_id: i64,
        filename: &str,
        filepath: &str,
    ) -> AppResult<ProblemAttachment> {
        let attachment = sqlx::query_as::<_, ProblemAttachment>(
            r#"
            INSERT INTO problem_attachments (module_id, filename, filepath)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(module_id)
        .bind(filename)
        .bind(filepath)
        .fetch_one(pool)
        .await?;

        Ok(attachment)
    }

    /// Problem attachments of a module
    pub async fn problem_attachments(
        pool: &PgPool,
        module_id: i64,
    ) -> AppResult<Vec<ProblemAttachment>> {
        let attachments = sqlx::query_as::<_, ProblemAttachment>(
            r#"SELECT * FROM problem_attachments WHERE module_id = $1 ORDER BY id"#,
        )
        .bind(module_id)
        .fetch_all(pool)
        .await?;

        Ok(attachments)
    }

    /// Find a problem attachment by ID
    pub async fn find_problem(pool: &PgPool, id: i64) -> AppResult<Option<ProblemAttachment>> {
        let attachment = sqlx::query_as::<_, ProblemAttachment>(
            r#"SELECT * FROM problem_attachments WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(attachment)
    }

    /// Delete a problem attachment row, returning its filepath for cleanup
    pub async fn delete_problem(pool: &PgPool, id: i64) -> AppResult<Option<String>> {
        let filepath: Option<String> = sqlx::query_scalar(
            r#"DELETE FROM problem_attachments WHERE id = $1 RETURNING filepath"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(filepath)
    }

    // =========================================================================
    // Answer attachments
    // =========================================================================

    /// Record an uploaded answer attachment
    pub async fn insert_answer(
        pool: &PgPool,
        module_id: i64,
        contestant_id: i64,
        filename: &str,
        filepath: &str,
    ) -> AppResult<AnswerAttachment> {
        let attachment = sqlx::query_as::<_, AnswerAttachment>(
            r#"
            INSERT INTO answer_attachments (module_id, contestant_id, filename, filepath)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(module_id)
        .bind(contestant_id)
        .bind(filename)
        .bind(filepath)
        .fetch_one(pool)
        .await?;

        Ok(attachment)
    }

    /// Answer attachments of one contestant for a module
    pub async fn answer_attachments(
        pool: &PgPool,
        module_id: i64,
        contestant_id: i64,
    ) -> AppResult<Vec<AnswerAttachment>> {
        let attachments = sqlx::query_as::<_, AnswerAttachment>(
            r#"
            SELECT * FROM answer_attachments
            WHERE module_id = $1 AND contestant_id = $2
            ORDER BY id
            "#,
        )
        .bind(module_id)
        .bind(contestant_id)
        .fetch_all(pool)
        .await?;

        Ok(attachments)
    }

    /// Find an answer attachment by ID
    pub async fn find_answer(pool: &PgPool, id: i64) -> AppResult<Option<AnswerAttachment>> {
        let attachment = sqlx::query_as::<_, AnswerAttachment>(
            r#"SELECT * FROM answer_attachments WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(attachment)
    }

    /// Delete an answer attachment row, returning its filepath for cleanup
    pub async fn delete_answer(pool: &PgPool, id: i64) -> AppResult<Option<String>> {
        let filepath: Option<String> = sqlx::query_scalar(
            r#"DELETE FROM answer_attachments WHERE id = $1 RETURNING filepath"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(filepath)
    }
}
