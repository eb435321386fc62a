//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User role in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum UserRole {
    /// Full system access
    Admin,
    /// Oversees one or more events, manages rubrics and evaluation
    ChiefJudge,
    /// Scores contestants assigned to them
    Judge,
    /// Competes in events and submits work
    Contestant,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::ChiefJudge => write!(f, "chief_judge"),
            UserRole::Judge => write!(f, "judge"),
            UserRole::Contestant => write!(f, "contestant"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "chief_judge" => Ok(UserRole::ChiefJudge),
            "judge" => Ok(UserRole::Judge),
            "contestant" => Ok(UserRole::Contestant),
            _ => Err(()),
        }
    }
}

/// Minimal user projection used for rosters and scoring views
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub name: String,
}

/// User database model (mirror of the identity provider)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [
            UserRole::Admin,
            UserRole::ChiefJudge,
            UserRole::Judge,
            UserRole::Contestant,
        ] {
            assert_eq!(role.to_string().parse::<UserRole>(), Ok(role));
        }
        assert!("organizer".parse::<UserRole>().is_err());
    }
}
