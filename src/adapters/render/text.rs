//! Plain-text rendering

use super::{RenderBody, RenderPayload, RenderSink};
use crate::core::assemble::long_date;
use crate::core::builder::{BuilderElement, ElementKind, FieldValues};
use crate::core::variables::MISSING_VALUE;
use crate::domain::Result;
use serde_json::Value;
use std::fmt::Write;

/// Renders documents as plain text for terminals and files
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    /// Print the title and identity lines before the body
    pub with_header: bool,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self { with_header: true }
    }

    fn render_header(&self, out: &mut String, payload: &RenderPayload<'_>) {
        let _ = writeln!(out, "{}", payload.title);
        let _ = writeln!(out, "{}", "=".repeat(payload.title.chars().count()));
        let _ = writeln!(out, "Document: {}", payload.document_id);
        if let Some(patient) = payload.patient_name {
            let _ = writeln!(out, "Patient: {patient}");
        }
        if let Some(doctor) = payload.doctor_name {
            let _ = writeln!(out, "Doctor: {doctor}");
        }
        let _ = writeln!(out, "Date: {}", long_date(payload.created_at.date_naive()));
        out.push('\n');
    }

    fn render_form(&self, out: &mut String, elements: &[BuilderElement], values: &FieldValues) {
        let mut ordered: Vec<&BuilderElement> = elements.iter().collect();
        ordered.sort_by_key(|e| (e.position.row, e.position.column));

        for element in ordered {
            match &element.kind {
                ElementKind::Divider => {
                    let _ = writeln!(out, "{}", "-".repeat(40));
                }
                ElementKind::Header { text, .. } => {
                    let text = text.as_deref().unwrap_or(&element.label);
                    let _ = writeln!(out, "\n{}", text.to_uppercase());
                }
                _ => {
                    let label = if element.label.is_empty() {
                        &element.name
                    } else {
                        &element.label
                    };
                    let value = values
                        .get(&element.name)
                        .map(display_value)
                        .unwrap_or_else(|| MISSING_VALUE.to_string());
                    let _ = writeln!(out, "{label}: {value}");
                }
            }
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => MISSING_VALUE.to_string(),
        Value::String(s) if s.trim().is_empty() => MISSING_VALUE.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl RenderSink for TextRenderer {
    fn render(&self, payload: &RenderPayload<'_>) -> Result<String> {
        let mut out = String::new();

        if self.with_header {
            self.render_header(&mut out, payload);
        }

        match payload.body {
            RenderBody::Text(body) => {
                out.push_str(body);
                if !body.ends_with('\n') {
                    out.push('\n');
                }
            }
            RenderBody::Form { elements, values } => self.render_form(&mut out, elements, values),
        }

        Ok(out)
    }
}
