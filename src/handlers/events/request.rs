//! Event request payloads

use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    pub competition_id: i64,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    pub competition_id: Option<i64>,
}

/// Add one user to a role roster
#[derive(Debug, Deserialize)]
pub struct RosterRequest {
    pub user_id: i64,
}

/// Restrict a judge to one contestant
#[derive(Debug, Deserialize)]
pub struct AssignContestantRequest {
    pub contestant_id: i64,
}
