//! Configuration loader for YAML files and environment overrides

use std::env;
use std::path::Path;
use tokio::fs;

use crate::config::types::ShareConfig;
use crate::errors::CoreError;

/// Overrides `api.base_url` when set
pub const API_URL_ENV: &str = "KARROT_API_URL";

/// Configuration loader with environment resolution
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<ShareConfig, CoreError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await.map_err(|e| {
            CoreError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_str(&content)
    }

    /// Load configuration from a YAML string, resolving the process environment
    pub fn from_str(content: &str) -> Result<ShareConfig, CoreError> {
        Self::from_str_with_env(content, |key| env::var(key).ok())
    }

    /// Load configuration from a YAML string, looking variables up through `lookup`
    pub fn from_str_with_env<L>(content: &str, lookup: L) -> Result<ShareConfig, CoreError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut config: ShareConfig = if content.trim().is_empty() {
            ShareConfig::default()
        } else {
            serde_yaml::from_str(content)
                .map_err(|e| CoreError::ConfigError(format!("Failed to parse YAML config: {}", e)))?
        };

        Self::resolve_environment(&mut config, &lookup)?;
        config.validate()?;

        Ok(config)
    }

    fn resolve_environment<L>(config: &mut ShareConfig, lookup: &L) -> Result<(), CoreError>
    where
        L: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            log::debug!("Using API URL from {}", API_URL_ENV);
            config.api.base_url = url;
        }

        if config.api.auth_token.is_none() {
            if let Some(var) = &config.api.auth_token_env {
                let token = lookup(var).ok_or_else(|| {
                    CoreError::ConfigError(format!(
                        "Environment variable '{}' for the API token is not set",
                        var
                    ))
                })?;
                config.api.auth_token = Some(token);
            }
        }

        Ok(())
    }
}
