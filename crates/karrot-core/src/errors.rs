//! Error types for the state layer
//!
//! Failures of individual requests never surface here: they land in the status
//! tracker of the operation that issued them. `CoreError` covers what happens
//! around the modules, such as loading configuration or wiring up the client.

use karrot_types::ApiError;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("I/O error: {0}")]
    IoError(String),
    #[error("API error: {0}")]
    ApiError(#[from] ApiError),
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::IoError(err.to_string())
    }
}
