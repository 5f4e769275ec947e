//! Configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::CoreError;

/// Top-level configuration of a Karrot client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root of the REST API, without the `/api` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Token sent as `Authorization: Token <token>`
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Environment variable to read the token from when `auth_token` is unset
    #[serde(default)]
    pub auth_token_env: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            auth_token: None,
            auth_token_env: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

impl ShareConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(CoreError::ConfigError(
                "API base_url cannot be empty".to_string(),
            ));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CoreError::ConfigError(format!(
                "API base_url must be an http(s) URL, got '{}'",
                base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(CoreError::ConfigError(
                "API timeout_secs must be greater than 0".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(CoreError::ConfigError(format!(
                "Unknown log level '{}', expected one of: {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}
