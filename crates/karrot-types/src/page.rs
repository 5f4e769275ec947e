//! Cursor-paginated page envelope.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque continuation token handed out by the server.
///
/// The token is never interpreted on the client; the REST layer either
/// requests it verbatim (absolute URL) or joins it to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drops empty tokens, which the server uses interchangeably with `null`.
    pub fn normalize(cursor: Option<Cursor>) -> Option<Cursor> {
        cursor.filter(|c| !c.is_empty())
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cursor {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Cursor {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// One page of results plus the cursor for the following page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<E> {
    pub results: Vec<E>,
    #[serde(default)]
    pub next: Option<Cursor>,
}

impl<E> Page<E> {
    pub fn new(results: Vec<E>, next: Option<Cursor>) -> Self {
        Self { results, next }
    }

    /// A page with nothing after it.
    pub fn last(results: Vec<E>) -> Self {
        Self {
            results,
            next: None,
        }
    }
}
