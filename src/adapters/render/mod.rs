//! Rendering sinks
//!
//! A sink turns a resolved document into its output form. Sinks never see
//! templates or raw records, only the payload produced from a
//! [`GeneratedDocument`](crate::core::document::GeneratedDocument).

pub mod text;

pub use text::TextRenderer;

use crate::core::builder::{BuilderElement, FieldValues};
use crate::domain::{DocumentId, Result};
use chrono::{DateTime, Utc};

/// What a sink receives for one document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPayload<'a> {
    pub title: &'a str,
    pub document_id: &'a DocumentId,
    pub patient_name: Option<&'a str>,
    pub doctor_name: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub body: RenderBody<'a>,
}

/// Resolved document body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderBody<'a> {
    /// Fully substituted text
    Text(&'a str),
    /// Builder elements with sanitized values
    Form {
        elements: &'a [BuilderElement],
        values: &'a FieldValues,
    },
}

/// Output target for resolved documents
pub trait RenderSink {
    /// Renders a payload to its final textual form
    fn render(&self, payload: &RenderPayload<'_>) -> Result<String>;
}
