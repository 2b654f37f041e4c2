//! Error types for Folio operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used across
//! all Folio crates, plus the [`NotFound`] value that single-item lookups
//! return instead of a general error. Uses `thiserror` for derive macros.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur in Folio operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error tied to a specific path.
    #[error("I/O error at {path}: {source}")]
    IoWithPath {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Configuration error (missing base URL, malformed config file).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Entity absent, or a slug that matched nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network failure or unexpected HTTP status from the backend.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Backend response could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Form input rejected before any request was sent.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Backend refused a form submission; carries the backend message verbatim.
    #[error("{0}")]
    BackendRejection(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a backend rejection carrying the backend's own message.
    pub fn backend_rejection(msg: impl Into<String>) -> Self {
        Self::BackendRejection(msg.into())
    }

    /// Wrap an I/O error with the path it concerns.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoWithPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns true for [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true for failures that degrade a page instead of breaking it.
    ///
    /// Listings turn these into an empty sequence and lookups into a miss.
    pub fn is_soft_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Decode(_) | Self::Config(_) | Self::NotFound(_)
        )
    }
}

/// Result type alias using Folio's Error type.
pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// NotFound
// ============================================================================

/// A single-item lookup that produced nothing.
///
/// Covers an absent entity, an unmatched slug, and a lookup whose request
/// failed in transport. The rendering layer treats all three the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no entry for '{slug}' at {endpoint}")]
pub struct NotFound {
    /// Endpoint or logical collection that was searched.
    pub endpoint: String,
    /// Slug (or path segment) that was requested.
    pub slug: String,
}

impl NotFound {
    /// Create a miss for `slug` in `endpoint`.
    pub fn new(endpoint: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            slug: slug.into(),
        }
    }
}

impl From<NotFound> for Error {
    fn from(miss: NotFound) -> Self {
        Self::NotFound(miss.to_string())
    }
}

// ============================================================================
// FieldErrors
// ============================================================================

/// Per-field validation messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Message recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// True when no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when empty, otherwise `Err(Error::Validation(self))`.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        f.write_str(&parts.join("; "))
    }
}
