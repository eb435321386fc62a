//! Module request payloads

use serde::Deserialize;
use validator::Validate;

use crate::models::ModuleStatus;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateModuleRequest {
    pub event_id: i64,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 1))]
    pub duration_minutes: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateModuleRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i32>,
}

/// Lifecycle transition; the enum bounds the accepted values.
#[derive(Debug, Deserialize)]
pub struct UpdateModuleStatusRequest {
    pub status: ModuleStatus,
}

#[derive(Debug, Deserialize)]
pub struct ListModulesQuery {
    pub event_id: Option<i64>,
}
