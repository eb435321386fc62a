//! Scoring response payloads

use serde::Serialize;

use crate::models::EvaluationType;

/// One rubric cell of the scoring grid.
///
/// `id` and both score channels are null until something has been written;
/// the rubric columns are always present so the grid stays stable.
#[derive(Debug, Clone, Serialize)]
pub struct ItemResultView {
    pub id: Option<i64>,
    pub scoring_item_id: i64,
    pub judge_score: Option<f64>,
    pub ai_score: Option<f64>,
    pub ai_suggestion: Option<String>,
    pub description: String,
    pub evaluation_type: EvaluationType,
    pub max_score: f64,
}

/// One row of the aggregate scoring view: a contestant with the full rubric.
///
/// `id` is the scoring record id, null while no record exists yet.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringRecordRow {
    pub id: Option<i64>,
    pub contestant_id: i64,
    pub username: String,
    pub contestant_name: String,
    pub item_results: Vec<ItemResultView>,
}
