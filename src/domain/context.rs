//! Error context extension trait
//!
//! Provides `.context()` and `.with_context()` on any `Result` whose error
//! converts into [`DocsError`], similar to `anyhow::Context` but keeping the
//! domain error type in library code.
//!
//! # Examples
//!
//! ```rust
//! use clinidoc::domain::Result;
//! use clinidoc::domain::context::ResultExt;
//!
//! fn read_fixture(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_context(|| format!("Failed to read record fixture: {}", path))
//! }
//! ```

use crate::domain::errors::DocsError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error (evaluated eagerly)
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error using a closure (evaluated only on error)
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<DocsError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| wrap(e.into(), context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

// Not-found keeps its variant so callers can still branch on it.
fn wrap(base: DocsError, context: impl std::fmt::Display) -> DocsError {
    match base {
        DocsError::NotFound(inner) => DocsError::NotFound(inner),
        other => DocsError::Other(format!("{context}: {other}")),
    }
}
