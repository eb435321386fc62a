//! Module response payloads

use serde::Serialize;

use crate::models::{Module, ProblemAttachment, ScoringCriteriaDetail};

/// Module detail with role-gated sub-resources
#[derive(Debug, Serialize)]
pub struct ModuleDetailResponse {
    #[serde(flatten)]
    pub module: Module,
    /// Empty while hidden from the caller's role
    pub problem_attachments: Vec<ProblemAttachment>,
    /// Only embedded for admin/chief-judge
    pub scoring_criteria: Option<ScoringCriteriaDetail>,
}
