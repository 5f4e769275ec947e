//! Client configuration
//!
//! Configuration is read from YAML. Every key has a default, so an empty file
//! is a valid configuration pointing at a local development server.

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;


use crate::errors::CoreError;
use std::path::Path;

/// Load a configuration from a YAML file
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<ShareConfig, CoreError> {
    ConfigLoader::from_file(path).await
}
