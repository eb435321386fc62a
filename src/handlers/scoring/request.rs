//! Scoring request payloads

use serde::Deserialize;
use validator::Validate;

use crate::models::EvaluationType;

#[derive(Debug, Deserialize, Validate)]
pub struct AddScoringItemRequest {
    #[validate(length(min = 1))]
    pub description: String,
    pub evaluation_type: EvaluationType,
    #[validate(range(exclusive_min = 0.0))]
    pub max_score: f64,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateScoringItemRequest {
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub evaluation_type: Option<EvaluationType>,
    #[validate(range(exclusive_min = 0.0))]
    pub max_score: Option<f64>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateJudgeScoreRequest {
    pub scoring_item_id: i64,
    #[validate(range(min = 0.0))]
    pub judge_score: f64,
}
