//! Domain error types
//!
//! This module defines the error hierarchy for Clinidoc. Library code returns
//! [`DocsError`]; the binary wraps it in `anyhow` at the edge.
//!
//! Submission problems (missing required fields, pattern violations) are not
//! errors: they travel inside a normal
//! [`SubmissionResult`](crate::core::builder::SubmissionResult) so the caller
//! can re-render the form. Unresolvable variables are not errors either.

use std::fmt;
use thiserror::Error;

/// Main Clinidoc error type
#[derive(Debug, Error)]
pub enum DocsError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A record is missing or not owned by the acting doctor
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Template content failed the structural check
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// Builder schema is malformed
    #[error("Invalid builder schema: {0}")]
    InvalidSchema(String),

    /// Record store errors
    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    /// Input validation errors (bad identifiers, bad arguments)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl DocsError {
    /// Returns true for the not-found family of errors
    pub fn is_not_found(&self) -> bool {
        matches!(self, DocsError::NotFound(_))
    }
}

/// Kind of record a lookup was made for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Doctor,
    Patient,
    Appointment,
    Template,
    Document,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Doctor => "Doctor",
            RecordKind::Patient => "Patient",
            RecordKind::Appointment => "Appointment",
            RecordKind::Template => "Template",
            RecordKind::Document => "Document",
        };
        f.write_str(name)
    }
}

/// A record that is absent or outside the acting doctor's scope
///
/// The two cases are deliberately indistinguishable to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind} not found: {id}")]
pub struct NotFoundError {
    /// Kind of record that was requested
    pub kind: RecordKind,

    /// Identifier that was requested
    pub id: String,
}

impl NotFoundError {
    /// Creates a new not-found error
    pub fn new(kind: RecordKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// Record store errors
///
/// These errors don't expose the underlying storage technology.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be opened or loaded
    #[error("Failed to load records: {0}")]
    LoadFailed(String),

    /// The store contents are not in the expected format
    #[error("Invalid record data: {0}")]
    InvalidData(String),

    /// A write was rejected
    #[error("Failed to write record: {0}")]
    WriteFailed(String),

    /// A record with the same identifier already exists
    #[error("Conflict: {0}")]
    Conflict(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for DocsError {
    fn from(err: std::io::Error) -> Self {
        DocsError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for DocsError {
    fn from(err: serde_json::Error) -> Self {
        DocsError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for DocsError {
    fn from(err: toml::de::Error) -> Self {
        DocsError::Configuration(format!("TOML parse error: {err}"))
    }
}
