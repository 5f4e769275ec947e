//! Error types for requests crossing the REST boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Result type alias for REST operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Field-keyed validation messages, as returned for rejected form submissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single message for a single field.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// First message reported for `field`, the one a form shows under the input.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Interprets a response body as field errors when it is structurally one.
    ///
    /// Accepts a JSON object whose values are strings or lists of strings. A body
    /// carrying nothing but `detail` is a generic failure, not a validation one.
    pub fn from_json(body: &Value) -> Option<Self> {
        let object = body.as_object()?;
        if object.is_empty() || (object.len() == 1 && object.contains_key("detail")) {
            return None;
        }

        let mut errors = Self::new();
        for (field, value) in object {
            match value {
                Value::String(message) => errors.add(field.clone(), message.clone()),
                Value::Array(items) => {
                    for item in items {
                        errors.add(field.clone(), item.as_str()?.to_string());
                    }
                }
                _ => return None,
            }
        }
        Some(errors)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Failures of a request to the REST API.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiError {
    /// Network failure, timeout, unexpected status or undecodable body
    #[error("Transport error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The server rejected the submitted data
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Builds the error for a non-success response.
    ///
    /// Only client errors (4xx) can carry field errors; a 5xx response is a
    /// transport failure whatever its body looks like.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<Value>(body).ok();

        if (400..500).contains(&status) {
            if let Some(errors) = parsed.as_ref().and_then(FieldErrors::from_json) {
                return Self::Validation(errors);
            }
        }

        let message = parsed
            .as_ref()
            .and_then(|value| value.get("detail"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("request failed with status {}", status)
                } else {
                    body.trim().to_string()
                }
            });

        Self::status(status, message)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Transport { .. } => None,
        }
    }

    pub fn first_field_error(&self, field: &str) -> Option<&str> {
        self.field_errors().and_then(|errors| errors.first(field))
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            Self::Validation(_) => Some(400),
        }
    }
}
