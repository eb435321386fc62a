//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// STORAGE DEFAULTS
// =============================================================================

/// Default root directory for uploaded attachments
pub const DEFAULT_UPLOAD_DIR: &str = "./uploads";

/// Maximum accepted upload size in bytes (32 MiB)
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

// =============================================================================
// AI EVALUATION DEFAULTS
// =============================================================================

/// Default vision model identifier
pub const DEFAULT_AI_MODEL: &str = "qwen3-vl-32b";

/// Default per-call deadline for the vision model in seconds
pub const DEFAULT_AI_TIMEOUT_SECONDS: u64 = 120;

/// Response budget for objective (numeric score) prompts
pub const OBJECTIVE_MAX_TOKENS: u32 = 50;

/// Response budget for subjective (free text) prompts
pub const SUBJECTIVE_MAX_TOKENS: u32 = 500;
