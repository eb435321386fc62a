//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor. The evaluation
//! tracker and the evaluator registry are owned here and injected into
//! handlers, never kept as ambient globals.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::evaluation::{EvaluationTracker, EvaluatorRegistry};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Config,

    /// In-flight evaluation run tracker
    pub evaluations: EvaluationTracker,

    /// Per-module evaluation strategy registry
    pub evaluators: EvaluatorRegistry,
}

impl AppState {
    /// Create a new application state
    pub fn new(db: PgPool, config: Config, evaluators: EvaluatorRegistry) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db,
                config,
                evaluations: EvaluationTracker::new(),
                evaluators,
            }),
        }
    }

    /// Get a reference to the database pool
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get a reference to the evaluation tracker
    pub fn evaluations(&self) -> &EvaluationTracker {
        &self.inner.evaluations
    }

    /// Get a reference to the evaluator registry
    pub fn evaluators(&self) -> &EvaluatorRegistry {
        &self.inner.evaluators
    }
}
