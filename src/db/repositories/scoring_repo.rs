//! Scoring repository
//!
//! Holds the rubric tables and the score merge store. Record creation and
//! per-channel result writes are single-statement upserts against the unique
//! keys, never read-then-write.

use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{
        EvaluationType, ScoringCriteria, ScoringCriteriaDetail, ScoringItem, ScoringItemResult,
    },
};

/// A result row joined with its owning record's contestant
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContestantItemResult {
    pub contestant_id: i64,
    pub scoring_record_id: i64,
    pub id: i64,
    pub scoring_item_id: i64,
    pub judge_score: Option<f64>,
    pub ai_score: Option<f64>,
    pub ai_suggestion: Option<String>,
}

/// Repository for scoring criteria, records and item results
pub struct ScoringRepository;

impl ScoringRepository {
    // =========================================================================
    // Criteria
    // =========================================================================

    /// Create the rubric header for a module
    pub async fn create_criteria(pool: &PgPool, module_id: i64) -> AppResult<ScoringCriteria> {
        let criteria = sqlx::query_as::<_, ScoringCriteria>(
            r#"
            INSERT INTO scoring_criteria (module_id)
            VALUES ($1)
            RETURNING *
            "#,
        )
        .bind(module_id)
        .fetch_one(pool)
        .await?;

        Ok(criteria)
    }

    /// Find the rubric header for a module
    pub async fn find_criteria(pool: &PgPool, module_id: i64) -> AppResult<Option<ScoringCriteria>> {
        let criteria = sqlx::query_as::<_, ScoringCriteria>(
            r#"SELECT * FROM scoring_criteria WHERE module_id = $1"#,
        )
        .bind(module_id)
        .fetch_optional(pool)
        .await?;

        Ok(criteria)
    }

    /// Find a rubric header by its own id
    pub async fn find_criteria_by_id(
        pool: &PgPool,
        criteria_id: i64,
    ) -> AppResult<Option<ScoringCriteria>> {
        let criteria =
            sqlx::query_as::<_, ScoringCriteria>(r#"SELECT * FROM scoring_criteria WHERE id = $1"#)
                .bind(criteria_id)
                .fetch_optional(pool)
                .await?;

        Ok(criteria)
    }

    /// Rubric with its items in sort order, if the module has one
    pub async fn criteria_with_items(
        pool: &PgPool,
        module_id: i64,
    ) -> AppResult<Option<ScoringCriteriaDetail>> {
        let Some(criteria) = Self::find_criteria(pool, module_id).await? else {
            return Ok(None);
        };

        let items = Self::items_for_criteria(pool, criteria.id).await?;

        Ok(Some(ScoringCriteriaDetail { criteria, items }))
    }

    /// Items of a rubric in stable sort order
    pub async fn items_for_criteria(pool: &PgPool, criteria_id: i64) -> AppResult<Vec<ScoringItem>> {
        let items = sqlx::query_as::<_, ScoringItem>(
            r#"
            SELECT id, criteria_id, description, evaluation_type, max_score, sort_order
            FROM scoring_items
            WHERE criteria_id = $1
            ORDER BY sort_order, id
            "#,
        )
        .bind(criteria_id)
        .fetch_all(pool)
        .await?;

        Ok(items)
    }

    /// Add an item to a rubric
    pub async fn add_item(
        pool: &PgPool,
        criteria_id: i64,
        description: &str,
        evaluation_type: EvaluationType,
        max_score: f64,
        sort_order: i32,
    ) -> AppResult<ScoringItem> {
        let item = sqlx::query_as::<_, ScoringItem>(
            r#"
            INSERT INTO scoring_items (criteria_id, description, evaluation_type, max_score, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, criteria_id, description, evaluation_type, max_score, sort_order
            "#,
        )
        .bind(criteria_id)
        .bind(description)
        .bind(evaluation_type)
        .bind(max_score)
        .bind(sort_order)
        .fetch_one(pool)
        .await?;

        Ok(item)
    }

    /// Update an item's fields (None leaves the field unchanged)
    pub async fn update_item(
        pool: &PgPool,
        id: i64,
        description: Option<&str>,
        evaluation_type: Option<EvaluationType>,
        max_score: Option<f64>,
        sort_order: Option<i32>,
    ) -> AppResult<Option<ScoringItem>> {
        let item = sqlx::query_as::<_, ScoringItem>(
            r#"
            UPDATE scoring_items
            SET description = COALESCE($2, description),
                evaluation_type = COALESCE($3, evaluation_type),
                max_score = COALESCE($4, max_score),
                sort_order = COALESCE($5, sort_order),
                updated_at = now()
            WHERE id = $1
            RETURNING id, criteria_id, description, evaluation_type, max_score, sort_order
            "#,
        )
        .bind(id)
        .bind(description)
        .bind(evaluation_type)
        .bind(max_score)
        .bind(sort_order)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    /// Delete an item
    pub async fn delete_item(pool: &PgPool, id: i64) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM scoring_items WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Create-or-fetch the record for (module, contestant), returning its id
    pub async fn ensure_record(pool: &PgPool, module_id: i64, contestant_id: i64) -> AppResult<i64> {
        let record_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO scoring_records (module_id, contestant_id)
            VALUES ($1, $2)
            ON CONFLICT (module_id, contestant_id)
            DO UPDATE SET updated_at = now()
            RETURNING id
            "#,
        )
        .bind(module_id)
        .bind(contestant_id)
        .fetch_one(pool)
        .await?;

        Ok(record_id)
    }

    /// Create the record if absent; existing records are left untouched
    pub async fn create_record_if_absent(
        pool: &PgPool,
        module_id: i64,
        contestant_id: i64,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO scoring_records (module_id, contestant_id)
            VALUES ($1, $2)
            ON CONFLICT (module_id, contestant_id) DO NOTHING
            "#,
        )
        .bind(module_id)
        .bind(contestant_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Existing records of a module
    pub async fn records_for_module(
        pool: &PgPool,
        module_id: i64,
    ) -> AppResult<Vec<crate::models::ScoringRecord>> {
        let records = sqlx::query_as::<_, crate::models::ScoringRecord>(
            r#"SELECT * FROM scoring_records WHERE module_id = $1"#,
        )
        .bind(module_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Record id for (module, contestant), if one exists
    pub async fn find_record_id(
        pool: &PgPool,
        module_id: i64,
        contestant_id: i64,
    ) -> AppResult<Option<i64>> {
        let record_id: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM scoring_records
            WHERE module_id = $1 AND contestant_id = $2
            "#,
        )
        .bind(module_id)
        .bind(contestant_id)
        .fetch_optional(pool)
        .await?;

        Ok(record_id)
    }

    // =========================================================================
    // Item results (channel-scoped upserts)
    // =========================================================================

    /// Upsert the judge channel of one item result; the AI channel is untouched
    pub async fn upsert_judge_score(
        pool: &PgPool,
        scoring_record_id: i64,
        scoring_item_id: i64,
        judge_score: f64,
    ) -> AppResult<ScoringItemResult> {
        let result = sqlx::query_as::<_, ScoringItemResult>(
            r#"
            INSERT INTO scoring_item_results (scoring_record_id, scoring_item_id, judge_score)
            VALUES ($1, $2, $3)
            ON CONFLICT (scoring_record_id, scoring_item_id)
            DO UPDATE SET judge_score = $3, updated_at = now()
            RETURNING id, scoring_record_id, scoring_item_id, judge_score, ai_score, ai_suggestion
            "#,
        )
        .bind(scoring_record_id)
        .bind(scoring_item_id)
        .bind(judge_score)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Upsert the AI channel of one item result; the judge channel is untouched
    pub async fn upsert_ai_result(
        pool: &PgPool,
        scoring_record_id: i64,
        scoring_item_id: i64,
        ai_score: Option<f64>,
        ai_suggestion: Option<&str>,
    ) -> AppResult<ScoringItemResult> {
        let result = sqlx::query_as::<_, ScoringItemResult>(
            r#"
            INSERT INTO scoring_item_results (scoring_record_id, scoring_item_id, ai_score, ai_suggestion)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (scoring_record_id, scoring_item_id)
            DO UPDATE SET ai_score = $3, ai_suggestion = $4, updated_at = now()
            RETURNING id, scoring_record_id, scoring_item_id, judge_score, ai_score, ai_suggestion
            "#,
        )
        .bind(scoring_record_id)
        .bind(scoring_item_id)
        .bind(ai_score)
        .bind(ai_suggestion)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// All item results of a module, tagged with their contestant
    pub async fn item_results_for_module(
        pool: &PgPool,
        module_id: i64,
    ) -> AppResult<Vec<ContestantItemResult>> {
        let results = sqlx::query_as::<_, ContestantItemResult>(
            r#"
            SELECT sr.contestant_id,
                   sir.scoring_record_id,
                   sir.id,
                   sir.scoring_item_id,
                   sir.judge_score,
                   sir.ai_score,
                   sir.ai_suggestion
            FROM scoring_item_results sir
            JOIN scoring_records sr ON sr.id = sir.scoring_record_id
            WHERE sr.module_id = $1
            "#,
        )
        .bind(module_id)
        .fetch_all(pool)
        .await?;

        Ok(results)
    }

    /// Item results of one record
    pub async fn item_results_for_record(
        pool: &PgPool,
        scoring_record_id: i64,
    ) -> AppResult<Vec<ScoringItemResult>> {
        let results = sqlx::query_as::<_, ScoringItemResult>(
            r#"
            SELECT id, scoring_record_id, scoring_item_id, judge_score, ai_score, ai_suggestion
            FROM scoring_item_results
            WHERE scoring_record_id = $1
            "#,
        )
        .bind(scoring_record_id)
        .fetch_all(pool)
        .await?;

        Ok(results)
    }
}
