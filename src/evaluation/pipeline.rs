//! Evaluation pipeline
//!
//! Runs admitted evaluation tasks to completion. Entry points are spawned as
//! detached Tokio tasks after the trigger handler has already answered
//! "accepted"; outcomes are observable only through persisted rows and the
//! tracker's transient state. Each run owns its [`EvaluationSlot`], so the
//! dedup token is released on success, no-op and failure paths alike.

use crate::db::repositories::{
    AttachmentRepository, EventRepository, ModuleRepository, ScoringRepository,
};
use crate::error::AppResult;
use crate::models::{ProblemAttachment, ScoringCriteriaDetail};
use crate::state::AppState;

use super::tracker::EvaluationSlot;

/// Whole-module run: evaluates every contestant of the owning event.
pub async fn run_module_evaluation(state: AppState, module_id: i64, slot: EvaluationSlot) {
    // Hold the slot for the lifetime of the run.
    let _slot = slot;

    if let Err(e) = module_run(&state, module_id).await {
        tracing::error!(module_id, error = ?e, "Module evaluation run failed");
    }
}

/// Single-contestant run.
pub async fn run_contestant_evaluation(
    state: AppState,
    module_id: i64,
    contestant_id: i64,
    slot: EvaluationSlot,
) {
    let _slot = slot;

    if let Err(e) = contestant_run(&state, module_id, contestant_id).await {
        tracing::error!(module_id, contestant_id, error = ?e, "Contestant evaluation run failed");
    }
}

async fn module_run(state: &AppState, module_id: i64) -> AppResult<()> {
    let Some(setup) = load_run_setup(state, module_id).await? else {
        return Ok(());
    };

    let contestants = EventRepository::contestant_ids(state.db(), setup.event_id).await?;

    for contestant_id in contestants {
        // Partial-failure isolation: one contestant's failure must not
        // prevent the others from being evaluated.
        if let Err(e) =
            evaluate_contestant(state, module_id, contestant_id, &setup.criteria, &setup.problem)
                .await
        {
            tracing::error!(module_id, contestant_id, error = ?e, "Contestant evaluation failed");
        }
    }

    tracing::info!(module_id, "Module evaluation completed");
    Ok(())
}

async fn contestant_run(state: &AppState, module_id: i64, contestant_id: i64) -> AppResult<()> {
    let Some(setup) = load_run_setup(state, module_id).await? else {
        return Ok(());
    };

    evaluate_contestant(state, module_id, contestant_id, &setup.criteria, &setup.problem).await?;

    tracing::info!(module_id, contestant_id, "Contestant evaluation completed");
    Ok(())
}

struct RunSetup {
    event_id: i64,
    criteria: ScoringCriteriaDetail,
    problem: Vec<ProblemAttachment>,
}

/// Preconditions shared by both entry points. A `None` ends the run cleanly:
/// a module without a strategy or rubric is a no-op, not a failure.
async fn load_run_setup(state: &AppState, module_id: i64) -> AppResult<Option<RunSetup>> {
    if !state.evaluators().has_evaluator(module_id) {
        tracing::info!(module_id, "No evaluator registered for module");
        return Ok(None);
    }

    let Some(criteria) = ScoringRepository::criteria_with_items(state.db(), module_id).await? else {
        tracing::info!(module_id, "No scoring criteria found for module");
        return Ok(None);
    };

    let Some(event_id) = ModuleRepository::event_id_for_module(state.db(), module_id).await? else {
        tracing::warn!(module_id, "Module vanished before evaluation started");
        return Ok(None);
    };

    let problem = AttachmentRepository::problem_attachments(state.db(), module_id).await?;

    Ok(Some(RunSetup {
        event_id,
        criteria,
        problem,
    }))
}

/// Evaluate one contestant and persist the AI channel of each item result.
async fn evaluate_contestant(
    state: &AppState,
    module_id: i64,
    contestant_id: i64,
    criteria: &ScoringCriteriaDetail,
    problem: &[ProblemAttachment],
) -> AppResult<()> {
    let answers =
        AttachmentRepository::answer_attachments(state.db(), module_id, contestant_id).await?;

    if answers.is_empty() {
        tracing::debug!(module_id, contestant_id, "No answer attachments, skipping contestant");
        return Ok(());
    }

    let Some(results) = state
        .evaluators()
        .evaluate(module_id, criteria, problem, &answers)
        .await?
    else {
        return Ok(());
    };

    let record_id = ScoringRepository::ensure_record(state.db(), module_id, contestant_id).await?;

    for result in &results {
        ScoringRepository::upsert_ai_result(
            state.db(),
            record_id,
            result.scoring_item_id,
            result.ai_score,
            result.ai_suggestion.as_deref(),
        )
        .await?;
    }

    tracing::info!(
        module_id,
        contestant_id,
        items = results.len(),
        "AI evaluation results persisted"
    );
    Ok(())
}
