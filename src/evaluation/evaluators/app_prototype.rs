//! App prototype design evaluator
//!
//! Contestants submit numbered screenshots (`01.jpeg` .. `10.jpeg`); each
//! scoring item names the screenshot it applies to in its description. The
//! strategy finds that answer attachment, sends it to the vision model with
//! an objective or subjective prompt, and maps the response onto the item's
//! AI channel. Per-item failures become an `ai_suggestion` note so one bad
//! image never sinks the rest of the rubric.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use base64::Engine;
use regex::Regex;

use crate::constants::{OBJECTIVE_MAX_TOKENS, SUBJECTIVE_MAX_TOKENS};
use crate::models::{AnswerAttachment, EvaluationType, ProblemAttachment, ScoringCriteriaDetail, ScoringItem};

use super::super::registry::{ItemEvaluation, ModuleEvaluator};
use super::super::vision::VisionClient;

static IMAGE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2})\.jpeg").expect("invalid image reference regex"));

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d.]+").expect("invalid number regex"));

/// Strategy scoring app prototype screenshots with the vision model
pub struct AppPrototypeEvaluator {
    vision: Arc<VisionClient>,
}

impl AppPrototypeEvaluator {
    pub fn new(vision: Arc<VisionClient>) -> Self {
        Self { vision }
    }

    async fn evaluate_item(
        &self,
        item: &ScoringItem,
        answer_attachments: &[AnswerAttachment],
    ) -> anyhow::Result<ItemEvaluation> {
        let Some(target) = image_reference(&item.description) else {
            tracing::debug!(item_id = item.id, "No image referenced by scoring item");
            return Ok(ItemEvaluation {
                scoring_item_id: item.id,
                ai_score: None,
                ai_suggestion: Some("Scoring item does not reference an image".to_string()),
            });
        };

        let Some(attachment) = answer_attachments
            .iter()
            .find(|att| att.filename.eq_ignore_ascii_case(&target))
        else {
            tracing::debug!(item_id = item.id, filename = %target, "Referenced answer attachment missing");
            return Ok(ItemEvaluation {
                scoring_item_id: item.id,
                ai_score: None,
                ai_suggestion: Some(format!("Answer attachment not found: {target}")),
            });
        };

        let bytes = tokio::fs::read(&attachment.filepath).await?;
        let image_data_url = format!(
            "data:image/jpeg;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        );

        let prompt = build_prompt(item);
        let max_tokens = match item.evaluation_type {
            EvaluationType::Objective => OBJECTIVE_MAX_TOKENS,
            EvaluationType::Subjective => SUBJECTIVE_MAX_TOKENS,
        };

        tracing::debug!(item_id = item.id, filename = %target, "Calling vision model");
        let response = self.vision.complete(&image_data_url, &prompt, max_tokens).await?;

        Ok(match item.evaluation_type {
            EvaluationType::Objective => ItemEvaluation {
                scoring_item_id: item.id,
                ai_score: Some(parse_objective_score(&response, item.max_score)),
                ai_suggestion: None,
            },
            EvaluationType::Subjective => ItemEvaluation {
                scoring_item_id: item.id,
                ai_score: None,
                ai_suggestion: Some(response),
            },
        })
    }
}

#[async_trait]
impl ModuleEvaluator for AppPrototypeEvaluator {
    async fn evaluate(
        &self,
        criteria: &ScoringCriteriaDetail,
        _problem_attachments: &[ProblemAttachment],
        answer_attachments: &[AnswerAttachment],
    ) -> anyhow::Result<Vec<ItemEvaluation>> {
        let mut results = Vec::with_capacity(criteria.items.len());

        // Items run in rubric order; their descriptions reference screenshots
        // by position.
        for item in &criteria.items {
            match self.evaluate_item(item, answer_attachments).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!(item_id = item.id, error = ?e, "Scoring item evaluation failed");
                    results.push(ItemEvaluation {
                        scoring_item_id: item.id,
                        ai_score: None,
                        ai_suggestion: Some(format!("Evaluation failed: {e}")),
                    });
                }
            }
        }

        Ok(results)
    }
}

/// Extract the screenshot filename an item's description refers to.
fn image_reference(description: &str) -> Option<String> {
    IMAGE_REF
        .captures(description)
        .map(|caps| format!("{}.jpeg", &caps[1]))
}

/// Build the model prompt for one item.
fn build_prompt(item: &ScoringItem) -> String {
    match item.evaluation_type {
        EvaluationType::Objective => format!(
            "Score the image objectively against the following criterion:\n\
             {}\n\n\
             Maximum score: {}\n\n\
             Reply with the numeric score only (two decimal places), no other text.",
            item.description, item.max_score
        ),
        EvaluationType::Subjective => format!(
            "Assess the image against the following criterion:\n\
             {}\n\n\
             Provide detailed feedback and concrete suggestions for improvement.",
            item.description
        ),
    }
}

/// Pull the first number out of the model response, clamped to `max_score`.
/// An unparseable response scores zero.
fn parse_objective_score(response: &str, max_score: f64) -> f64 {
    NUMBER
        .find(response)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
        .min(max_score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(description: &str, evaluation_type: EvaluationType, max_score: f64) -> ScoringItem {
        ScoringItem {
            id: 1,
            criteria_id: 1,
            description: description.to_string(),
            evaluation_type,
            max_score,
            sort_order: 0,
        }
    }

    #[test]
    fn extracts_image_reference_from_description() {
        assert_eq!(
            image_reference("Layout consistency of 03.jpeg"),
            Some("03.jpeg".to_string())
        );
        assert_eq!(
            image_reference("Check 10.jpeg against the brief"),
            Some("10.jpeg".to_string())
        );
        assert_eq!(image_reference("No image here"), None);
        // Single-digit names don't match the two-digit convention.
        assert_eq!(image_reference("see 3.jpeg"), None);
    }

    #[test]
    fn objective_prompt_carries_max_score_and_numeric_instruction() {
        let prompt = build_prompt(&item("Color contrast of 01.jpeg", EvaluationType::Objective, 15.0));
        assert!(prompt.contains("Maximum score: 15"));
        assert!(prompt.contains("numeric score only"));
    }

    #[test]
    fn subjective_prompt_asks_for_feedback() {
        let prompt = build_prompt(&item("Navigation flow of 02.jpeg", EvaluationType::Subjective, 10.0));
        assert!(prompt.contains("suggestions for improvement"));
        assert!(!prompt.contains("numeric score"));
    }

    #[test]
    fn parses_and_clamps_objective_scores() {
        assert_eq!(parse_objective_score("8.50", 10.0), 8.5);
        assert_eq!(parse_objective_score("Score: 7", 10.0), 7.0);
        assert_eq!(parse_objective_score("12.0", 10.0), 10.0);
        assert_eq!(parse_objective_score("no number at all", 10.0), 0.0);
    }
}
