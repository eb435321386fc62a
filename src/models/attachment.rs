//! Attachment models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Problem attachment shared by all contestants of a module
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProblemAttachment {
    pub id: i64,
    pub module_id: i64,
    pub filename: String,
    pub filepath: String,
    pub created_at: DateTime<Utc>,
}

/// Answer attachment uploaded by one contestant for one module
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AnswerAttachment {
    pub id: i64,
    pub module_id: i64,
    pub contestant_id: i64,
    pub filename: String,
    pub filepath: String,
    pub created_at: DateTime<Utc>,
}
