//! SkillJudge - Skills Competition Scoring System
//!
//! This library provides the core functionality for the SkillJudge platform,
//! a scoring and evaluation service for multi-role skills competitions.
//!
//! # Features
//!
//! - Competition / event / module administration with role-scoped visibility
//! - Module lifecycle with scoring-record materialization
//! - Judge scoring gated by lifecycle state and judge↔contestant assignments
//! - Automated AI evaluation with pluggable per-module strategies
//! - Independent judge and AI score channels merged per rubric item
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic
//! - **Repositories**: Database access
//! - **Models**: Domain models and DTOs
//! - **Evaluation**: The automated evaluation engine (tracker, registry,
//!   pipeline, vision client)

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod evaluation;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
