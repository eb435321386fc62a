//! Application configuration management
//!
//! This module handles loading and validating configuration from environment
//! variables. All configuration is loaded at startup, before the application
//! serves any traffic, and is carried inside [`crate::state::AppState`] rather
//! than living in ambient global state.

use std::env;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_AI_MODEL, DEFAULT_AI_TIMEOUT_SECONDS, DEFAULT_DATABASE_MAX_CONNECTIONS,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_UPLOAD_DIR,
};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub ai: AiConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// JWT verification configuration (tokens are issued by the identity service)
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

/// Attachment storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
}

/// Vision model configuration for automated evaluation
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub base_url: Option<String>,
    pub api_key: String,
    pub model: String,
    /// Per-call deadline for the external model; the source system had none,
    /// a hung call would otherwise pin the module's evaluation token forever.
    pub timeout_seconds: u64,
    /// Module ids that get the built-in app-prototype evaluator at startup.
    pub app_prototype_modules: Vec<i64>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            ai: AiConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DEFAULT_DATABASE_MAX_CONNECTIONS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string()))?,
        })
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_SECRET".to_string()))?,
        })
    }
}

impl StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string())
                .into(),
        })
    }
}

impl AiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env::var("AI_BASE_URL").ok(),
            api_key: env::var("AI_API_KEY").unwrap_or_default(),
            model: env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_AI_MODEL.to_string()),
            timeout_seconds: env::var("AI_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| DEFAULT_AI_TIMEOUT_SECONDS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("AI_TIMEOUT_SECONDS".to_string()))?,
            app_prototype_modules: parse_module_ids(
                &env::var("AI_APP_PROTOTYPE_MODULES").unwrap_or_default(),
            )?,
        })
    }
}

/// Parse a comma-separated module id list, e.g. "3,17,42".
fn parse_module_ids(raw: &str) -> Result<Vec<i64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| ConfigError::InvalidValue("AI_APP_PROTOTYPE_MODULES".to_string()))
        })
        .collect()
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_module_id_list() {
        assert_eq!(parse_module_ids("").unwrap(), Vec::<i64>::new());
        assert_eq!(parse_module_ids("3").unwrap(), vec![3]);
        assert_eq!(parse_module_ids(" 3, 17 ,42 ").unwrap(), vec![3, 17, 42]);
    }

    #[test]
    fn rejects_non_numeric_module_ids() {
        assert!(parse_module_ids("3,abc").is_err());
    }
}
