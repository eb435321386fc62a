//! Module model and lifecycle states

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle status of a module.
///
/// The workflow is linear (`pending` → `in_progress` → `finished` → `scoring`
/// → `scoring_finished`) but the transition itself is a flat authorized write;
/// no backward transition is modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "module_status", rename_all = "snake_case")]
pub enum ModuleStatus {
    /// Defined but not started; invisible to contestants
    Pending,
    /// Contestants are working and may upload answers
    InProgress,
    /// Work closed; scoring records are materialized
    Finished,
    /// Judges may record scores
    Scoring,
    /// Judge scoring is frozen
    ScoringFinished,
}

impl std::fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleStatus::Pending => write!(f, "pending"),
            ModuleStatus::InProgress => write!(f, "in_progress"),
            ModuleStatus::Finished => write!(f, "finished"),
            ModuleStatus::Scoring => write!(f, "scoring"),
            ModuleStatus::ScoringFinished => write!(f, "scoring_finished"),
        }
    }
}

/// Module database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Module {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub duration_minutes: i32,
    pub status: ModuleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
