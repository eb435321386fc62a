//! Scoring models: rubric, records and per-item results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// How a scoring item is evaluated by the automated pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "evaluation_type", rename_all = "snake_case")]
pub enum EvaluationType {
    /// Free-text assessment; the AI channel fills `ai_suggestion`
    Subjective,
    /// Numeric score; the AI channel fills `ai_score`
    Objective,
}

/// Rubric header, at most one per module
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScoringCriteria {
    pub id: i64,
    pub module_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One gradable line entry of a rubric
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScoringItem {
    pub id: i64,
    pub criteria_id: i64,
    pub description: String,
    pub evaluation_type: EvaluationType,
    pub max_score: f64,
    pub sort_order: i32,
}

/// Rubric with its items in sort order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringCriteriaDetail {
    #[serde(flatten)]
    pub criteria: ScoringCriteria,
    pub items: Vec<ScoringItem>,
}

/// Per-(module, contestant) scoring container
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScoringRecord {
    pub id: i64,
    pub module_id: i64,
    pub contestant_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-(record, item) score cell.
///
/// The judge and AI channels are independent: each is written by its own
/// upsert and never clobbers the other.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScoringItemResult {
    pub id: i64,
    pub scoring_record_id: i64,
    pub scoring_item_id: i64,
    pub judge_score: Option<f64>,
    pub ai_score: Option<f64>,
    pub ai_suggestion: Option<String>,
}
