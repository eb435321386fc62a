//! Evaluator registry
//!
//! Pure dispatch table from module identifier to a pluggable evaluation
//! strategy. The registry performs no scoring itself; callers resolve and
//! invoke. Module identifiers are normalized to their canonical string form
//! so numeric and textual ids referring to the same module always collide.

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::models::{AnswerAttachment, ProblemAttachment, ScoringCriteriaDetail};

/// One scoring item's outcome from a strategy run
#[derive(Debug, Clone, PartialEq)]
pub struct ItemEvaluation {
    pub scoring_item_id: i64,
    pub ai_score: Option<f64>,
    pub ai_suggestion: Option<String>,
}

/// A pluggable per-module evaluation strategy.
///
/// Implementations receive the rubric in item sort order and must honor it:
/// some strategies derive meaning from sequential context.
#[async_trait]
pub trait ModuleEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        criteria: &ScoringCriteriaDetail,
        problem_attachments: &[ProblemAttachment],
        answer_attachments: &[AnswerAttachment],
    ) -> anyhow::Result<Vec<ItemEvaluation>>;
}

/// Dispatch table from normalized module id to strategy
#[derive(Default)]
pub struct EvaluatorRegistry {
    evaluators: RwLock<HashMap<String, Arc<dyn ModuleEvaluator>>>,
}

impl EvaluatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a strategy for a module; re-registration replaces silently.
    pub fn register(&self, module_id: impl Display, evaluator: Arc<dyn ModuleEvaluator>) {
        let key = module_id.to_string();
        tracing::info!(module_id = %key, "Evaluator registered");
        self.evaluators
            .write()
            .expect("evaluator registry poisoned")
            .insert(key, evaluator);
    }

    /// Whether a strategy is registered for the module
    pub fn has_evaluator(&self, module_id: impl Display) -> bool {
        self.evaluators
            .read()
            .expect("evaluator registry poisoned")
            .contains_key(&module_id.to_string())
    }

    /// Invoke the registered strategy, or return `None` when there is none.
    ///
    /// A `None` means "nothing to do", not a failure.
    pub async fn evaluate(
        &self,
        module_id: impl Display,
        criteria: &ScoringCriteriaDetail,
        problem_attachments: &[ProblemAttachment],
        answer_attachments: &[AnswerAttachment],
    ) -> anyhow::Result<Option<Vec<ItemEvaluation>>> {
        let key = module_id.to_string();
        // Clone the strategy handle out so the lock is never held across await.
        let evaluator = {
            let map = self.evaluators.read().expect("evaluator registry poisoned");
            map.get(&key).cloned()
        };

        match evaluator {
            None => Ok(None),
            Some(evaluator) => {
                let results = evaluator
                    .evaluate(criteria, problem_attachments, answer_attachments)
                    .await?;
                Ok(Some(results))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEvaluator(Vec<ItemEvaluation>);

    #[async_trait]
    impl ModuleEvaluator for FixedEvaluator {
        async fn evaluate(
            &self,
            _criteria: &ScoringCriteriaDetail,
            _problem_attachments: &[ProblemAttachment],
            _answer_attachments: &[AnswerAttachment],
        ) -> anyhow::Result<Vec<ItemEvaluation>> {
            Ok(self.0.clone())
        }
    }

    fn empty_criteria() -> ScoringCriteriaDetail {
        use crate::models::ScoringCriteria;
        ScoringCriteriaDetail {
            criteria: ScoringCriteria {
                id: 1,
                module_id: 5,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            },
            items: Vec::new(),
        }
    }

    #[test]
    fn numeric_and_textual_ids_collide() {
        let registry = EvaluatorRegistry::new();
        registry.register(5, Arc::new(FixedEvaluator(Vec::new())));

        assert!(registry.has_evaluator(5));
        assert!(registry.has_evaluator("5"));
        assert!(!registry.has_evaluator(6));
    }

    #[test]
    fn re_registration_replaces_silently() {
        let registry = EvaluatorRegistry::new();
        registry.register("5", Arc::new(FixedEvaluator(Vec::new())));
        registry.register(
            5,
            Arc::new(FixedEvaluator(vec![ItemEvaluation {
                scoring_item_id: 9,
                ai_score: Some(4.0),
                ai_suggestion: None,
            }])),
        );

        assert!(registry.has_evaluator("5"));
    }

    #[tokio::test]
    async fn evaluate_without_strategy_is_a_noop() {
        let registry = EvaluatorRegistry::new();
        let outcome = registry
            .evaluate(42, &empty_criteria(), &[], &[])
            .await
            .unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn evaluate_dispatches_to_registered_strategy() {
        let registry = EvaluatorRegistry::new();
        let expected = vec![ItemEvaluation {
            scoring_item_id: 3,
            ai_score: None,
            ai_suggestion: Some("needs contrast".to_string()),
        }];
        registry.register(5, Arc::new(FixedEvaluator(expected.clone())));

        let outcome = registry
            .evaluate("5", &empty_criteria(), &[], &[])
            .await
            .unwrap();
        assert_eq!(outcome, Some(expected));
    }
}
