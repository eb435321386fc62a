//! Scoring service
//!
//! Rubric management, the aggregate scoring view, and the judge-score write
//! path. The aggregate view has outer-join semantics: one row per event
//! contestant whether or not a record exists yet, each carrying the full
//! rubric with empty stubs where no result has been written, so the scoring
//! UI always renders a stable grid.

use std::collections::HashMap;

use sqlx::PgPool;

use crate::{
    db::repositories::{
        EventRepository, ModuleRepository, ScoringRepository, UserRepository,
    },
    error::{AppError, AppResult},
    handlers::scoring::{
        request::{AddScoringItemRequest, UpdateJudgeScoreRequest, UpdateScoringItemRequest},
        response::{ItemResultView, ScoringRecordRow},
    },
    middleware::auth::AuthenticatedUser,
    models::{
        ModuleStatus, ScoringCriteria, ScoringCriteriaDetail, ScoringItem, ScoringItemResult,
        UserRole, UserSummary,
    },
    services::PermissionService,
};

/// Scoring service for business logic
pub struct ScoringService;

impl ScoringService {
    // =========================================================================
    // Criteria
    // =========================================================================

    /// Rubric of a module; visible to admin/chief-judge only.
    pub async fn get_criteria(
        pool: &PgPool,
        user: &AuthenticatedUser,
        module_id: i64,
    ) -> AppResult<Option<ScoringCriteriaDetail>> {
        PermissionService::require_roles(user, &[UserRole::Admin, UserRole::ChiefJudge])?;
        Self::require_module_access(pool, user, module_id).await?;

        ScoringRepository::criteria_with_items(pool, module_id).await
    }

    /// Create the rubric header for a module
    pub async fn create_criteria(
        pool: &PgPool,
        user: &AuthenticatedUser,
        module_id: i64,
    ) -> AppResult<ScoringCriteria> {
        PermissionService::require_roles(user, &[UserRole::Admin, UserRole::ChiefJudge])?;
        Self::require_module_access(pool, user, module_id).await?;

        if ScoringRepository::find_criteria(pool, module_id).await?.is_some() {
            return Err(AppError::InvalidInput(
                "Module already has scoring criteria".to_string(),
            ));
        }

        ScoringRepository::create_criteria(pool, module_id).await
    }

    /// Add an item to a rubric
    pub async fn add_item(
        pool: &PgPool,
        user: &AuthenticatedUser,
        criteria_id: i64,
        payload: AddScoringItemRequest,
    ) -> AppResult<ScoringItem> {
        PermissionService::require_roles(user, &[UserRole::Admin, UserRole::ChiefJudge])?;

        let criteria = ScoringRepository::find_criteria_by_id(pool, criteria_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Scoring criteria not found".to_string()))?;
        Self::require_module_access(pool, user, criteria.module_id).await?;

        ScoringRepository::add_item(
            pool,
            criteria_id,
            &payload.description,
            payload.evaluation_type,
            payload.max_score,
            payload.sort_order.unwrap_or(0),
        )
        .await
    }

    /// Update a rubric item
    pub async fn update_item(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: i64,
        payload: UpdateScoringItemRequest,
    ) -> AppResult<ScoringItem> {
        PermissionService::require_roles(user, &[UserRole::Admin, UserRole::ChiefJudge])?;

        ScoringRepository::update_item(
            pool,
            id,
            payload.description.as_deref(),
            payload.evaluation_type,
            payload.max_score,
            payload.sort_order,
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Scoring item not found".to_string()))
    }

    /// Delete a rubric item
    pub async fn delete_item(pool: &PgPool, user: &AuthenticatedUser, id: i64) -> AppResult<()> {
        PermissionService::require_roles(user, &[UserRole::Admin, UserRole::ChiefJudge])?;

        if !ScoringRepository::delete_item(pool, id).await? {
            return Err(AppError::NotFound("Scoring item not found".to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Aggregate scoring view of a module.
    ///
    /// One row per event contestant — contestants without a record still
    /// appear with a null record id and stubbed item results. Judges only
    /// get rows for contestants assigned to them.
    pub async fn get_scoring_records(
        pool: &PgPool,
        user: &AuthenticatedUser,
        module_id: i64,
    ) -> AppResult<Vec<ScoringRecordRow>> {
        let event_id = Self::require_module_access(pool, user, module_id).await?;

        let contestants = match user.role {
            UserRole::Judge => {
                EventRepository::assigned_contestants(pool, event_id, user.id).await?
            }
            _ => EventRepository::contestants(pool, event_id).await?,
        };

        let items = ScoringRepository::criteria_with_items(pool, module_id)
            .await?
            .map(|detail| detail.items)
            .unwrap_or_default();

        let records = ScoringRepository::records_for_module(pool, module_id).await?;
        let record_ids: HashMap<i64, i64> = records
            .iter()
            .map(|r| (r.contestant_id, r.id))
            .collect();

        let mut results_by_contestant: HashMap<i64, Vec<ScoringItemResult>> = HashMap::new();
        for row in ScoringRepository::item_results_for_module(pool, module_id).await? {
            results_by_contestant
                .entry(row.contestant_id)
                .or_default()
                .push(ScoringItemResult {
                    id: row.id,
                    scoring_record_id: row.scoring_record_id,
                    scoring_item_id: row.scoring_item_id,
                    judge_score: row.judge_score,
                    ai_score: row.ai_score,
                    ai_suggestion: row.ai_suggestion,
                });
        }

        let rows = contestants
            .into_iter()
            .map(|contestant| {
                let results = results_by_contestant
                    .get(&contestant.id)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                ScoringRecordRow {
                    id: record_ids.get(&contestant.id).copied(),
                    contestant_id: contestant.id,
                    username: contestant.username,
                    contestant_name: contestant.name,
                    item_results: merge_item_results(&items, results),
                }
            })
            .collect();

        Ok(rows)
    }

    /// Scoring view of one contestant; 404 until a record exists.
    pub async fn get_scoring_record(
        pool: &PgPool,
        user: &AuthenticatedUser,
        module_id: i64,
        contestant_id: i64,
    ) -> AppResult<ScoringRecordRow> {
        let event_id = Self::require_module_access(pool, user, module_id).await?;
        PermissionService::require_contestant_access(pool, user, event_id, contestant_id).await?;

        let record_id = ScoringRepository::find_record_id(pool, module_id, contestant_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Scoring record not found".to_string()))?;

        let contestant = UserRepository::find_by_id(pool, contestant_id)
            .await?
            .map(|u| UserSummary {
                id: u.id,
                username: u.username,
                name: u.name,
            })
            .ok_or_else(|| AppError::NotFound("Contestant not found".to_string()))?;

        let items = ScoringRepository::criteria_with_items(pool, module_id)
            .await?
            .map(|detail| detail.items)
            .unwrap_or_default();

        let results = ScoringRepository::item_results_for_record(pool, record_id).await?;

        Ok(ScoringRecordRow {
            id: Some(record_id),
            contestant_id: contestant.id,
            username: contestant.username,
            contestant_name: contestant.name,
            item_results: merge_item_results(&items, &results),
        })
    }

    /// Record a judge score for one item.
    ///
    /// Only allowed while the module is in `scoring`; `scoring_finished` is a
    /// terminal refusal. Judges must hold an assignment for the contestant;
    /// admins bypass the assignment check but not the status guard. The write
    /// touches the judge channel only.
    pub async fn record_judge_score(
        pool: &PgPool,
        user: &AuthenticatedUser,
        module_id: i64,
        contestant_id: i64,
        payload: UpdateJudgeScoreRequest,
    ) -> AppResult<ScoringItemResult> {
        let module = ModuleRepository::find_by_id(pool, module_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Module not found".to_string()))?;

        ensure_judge_write_allowed(module.status)?;

        PermissionService::require_roles(user, &[UserRole::Admin, UserRole::Judge])?;
        PermissionService::require_event_access(pool, user, module.event_id).await?;
        PermissionService::require_contestant_access(pool, user, module.event_id, contestant_id)
            .await?;

        let record_id = ScoringRepository::ensure_record(pool, module_id, contestant_id).await?;

        ScoringRepository::upsert_judge_score(
            pool,
            record_id,
            payload.scoring_item_id,
            payload.judge_score,
        )
        .await
    }

    /// Resolve the module's event and require access to it.
    async fn require_module_access(
        pool: &PgPool,
        user: &AuthenticatedUser,
        module_id: i64,
    ) -> AppResult<i64> {
        let event_id = ModuleRepository::event_id_for_module(pool, module_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Module not found".to_string()))?;

        PermissionService::require_event_access(pool, user, event_id).await?;

        Ok(event_id)
    }
}

/// Status guard for the judge-score write path.
fn ensure_judge_write_allowed(status: ModuleStatus) -> AppResult<()> {
    match status {
        ModuleStatus::ScoringFinished => Err(AppError::InvalidState(
            "Scoring has been finished and cannot be modified".to_string(),
        )),
        ModuleStatus::Scoring => Ok(()),
        _ => Err(AppError::InvalidState(
            "Module is not in scoring status".to_string(),
        )),
    }
}

/// Merge existing item results onto the rubric, stubbing missing cells.
///
/// Output order follows the rubric's item order so every row renders the
/// same grid.
fn merge_item_results(items: &[ScoringItem], results: &[ScoringItemResult]) -> Vec<ItemResultView> {
    items
        .iter()
        .map(|item| {
            let existing = results.iter().find(|r| r.scoring_item_id == item.id);
            ItemResultView {
                id: existing.map(|r| r.id),
                scoring_item_id: item.id,
                judge_score: existing.and_then(|r| r.judge_score),
                ai_score: existing.and_then(|r| r.ai_score),
                ai_suggestion: existing.and_then(|r| r.ai_suggestion.clone()),
                description: item.description.clone(),
                evaluation_type: item.evaluation_type,
                max_score: item.max_score,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EvaluationType;

    fn item(id: i64, sort_order: i32, max_score: f64) -> ScoringItem {
        ScoringItem {
            id,
            criteria_id: 1,
            description: format!("item {id}"),
            evaluation_type: EvaluationType::Objective,
            max_score,
            sort_order,
        }
    }

    fn result(scoring_item_id: i64, judge: Option<f64>, ai: Option<f64>) -> ScoringItemResult {
        ScoringItemResult {
            id: scoring_item_id * 10,
            scoring_record_id: 1,
            scoring_item_id,
            judge_score: judge,
            ai_score: ai,
            ai_suggestion: ai.map(|_| "looks fine".to_string()),
        }
    }

    #[test]
    fn judge_writes_only_allowed_while_scoring() {
        assert!(ensure_judge_write_allowed(ModuleStatus::Scoring).is_ok());

        for status in [
            ModuleStatus::Pending,
            ModuleStatus::InProgress,
            ModuleStatus::Finished,
            ModuleStatus::ScoringFinished,
        ] {
            assert!(matches!(
                ensure_judge_write_allowed(status),
                Err(AppError::InvalidState(_))
            ));
        }
    }

    #[test]
    fn merge_stubs_missing_results() {
        let items = vec![item(1, 0, 10.0), item(2, 1, 15.0)];
        let merged = merge_item_results(&items, &[]);

        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|v| v.id.is_none()
            && v.judge_score.is_none()
            && v.ai_score.is_none()
            && v.ai_suggestion.is_none()));
        assert_eq!(merged[0].scoring_item_id, 1);
        assert_eq!(merged[1].max_score, 15.0);
    }

    #[test]
    fn merge_keeps_both_channels_and_rubric_order() {
        let items = vec![item(2, 1, 15.0), item(1, 0, 10.0)];
        let results = vec![result(1, Some(8.0), Some(7.5))];

        // Items arrive already sorted by the repository; merge preserves
        // whatever order it is given.
        let merged = merge_item_results(&items, &results);
        assert_eq!(merged[0].scoring_item_id, 2);
        assert!(merged[0].judge_score.is_none());

        assert_eq!(merged[1].scoring_item_id, 1);
        assert_eq!(merged[1].judge_score, Some(8.0));
        assert_eq!(merged[1].ai_score, Some(7.5));
        assert_eq!(merged[1].ai_suggestion.as_deref(), Some("looks fine"));
    }

    #[test]
    fn merge_with_no_items_yields_empty_grid() {
        let merged = merge_item_results(&[], &[result(1, Some(8.0), None)]);
        assert!(merged.is_empty());
    }
}
