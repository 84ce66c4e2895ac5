//! Document template model
//!
//! A template belongs to one doctor and carries either a text body with
//! `{{path}}` placeholders (version "1.0") or a builder form schema
//! (version 2). The two formats coexist; the stored `version` field tells
//! them apart.

use super::builder::BuilderSchema;
use super::content::{TemplateContent, TEXT_TEMPLATE_VERSION};
use crate::domain::ids::{DoctorId, TemplateId};
use crate::domain::{DocsError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Classification of a template; not used for enforcement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Prescription,
    MedicalCertificate,
    LabReport,
    Referral,
    DischargeSummary,
    ConsultationNote,
    Invoice,
    #[default]
    Other,
}

impl TemplateCategory {
    /// All categories in display order
    pub const ALL: [TemplateCategory; 8] = [
        TemplateCategory::Prescription,
        TemplateCategory::MedicalCertificate,
        TemplateCategory::LabReport,
        TemplateCategory::Referral,
        TemplateCategory::DischargeSummary,
        TemplateCategory::ConsultationNote,
        TemplateCategory::Invoice,
        TemplateCategory::Other,
    ];

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            TemplateCategory::Prescription => "Prescription",
            TemplateCategory::MedicalCertificate => "Medical Certificate",
            TemplateCategory::LabReport => "Lab Report",
            TemplateCategory::Referral => "Referral",
            TemplateCategory::DischargeSummary => "Discharge Summary",
            TemplateCategory::ConsultationNote => "Consultation Note",
            TemplateCategory::Invoice => "Invoice",
            TemplateCategory::Other => "Other",
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Template body in one of the two supported formats
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TemplateBody {
    /// Version "1.0": text with placeholders
    Text(TemplateContent),
    /// Version 2: builder form
    Form(BuilderSchema),
}

impl TemplateBody {
    /// Parses a stored template body, dispatching on `version`
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::InvalidTemplate`] for an unknown version or a text
    /// body that fails the structural check, and
    /// [`DocsError::InvalidSchema`] for a malformed builder schema.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value.get("version") {
            Some(Value::String(v)) if v == TEXT_TEMPLATE_VERSION => {
                Ok(TemplateBody::Text(TemplateContent::parse(value)?))
            }
            Some(Value::Number(_)) => Ok(TemplateBody::Form(BuilderSchema::parse(value)?)),
            Some(other) => Err(DocsError::InvalidTemplate(format!(
                "unsupported template version {other}"
            ))),
            None => Err(DocsError::InvalidTemplate(
                "template content has no version".to_string(),
            )),
        }
    }

    /// Short name of the format for logs and output
    pub fn format_name(&self) -> &'static str {
        match self {
            TemplateBody::Text(_) => "text",
            TemplateBody::Form(_) => "form",
        }
    }
}

impl<'de> Deserialize<'de> for TemplateBody {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        TemplateBody::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// A doctor's document template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentTemplate {
    pub id: TemplateId,

    /// Owning doctor; lookups are scoped by this field
    pub doctor_id: DoctorId,

    pub name: String,

    #[serde(default)]
    pub category: TemplateCategory,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub content: TemplateBody,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&TemplateCategory::MedicalCertificate).unwrap();
        assert_eq!(json, "\"medical_certificate\"");
        assert_eq!(TemplateCategory::ALL.len(), 8);
        assert_eq!(TemplateCategory::DischargeSummary.to_string(), "Discharge Summary");
    }

    #[test]
    fn test_text_body_dispatch() {
        let body = TemplateBody::from_value(&json!({
            "version": "1.0", "variables": [], "elements": [], "content": "Hi"
        }))
        .unwrap();
        assert_eq!(body.format_name(), "text");
    }

    #[test]
    fn test_form_body_dispatch() {
        let body = TemplateBody::from_value(&json!({"version": 2, "elements": []})).unwrap();
        assert_eq!(body.format_name(), "form");
    }

    #[test]
    fn test_unknown_version_is_invalid() {
        let result = TemplateBody::from_value(&json!({"version": "3.0", "content": ""}));
        assert!(matches!(result, Err(DocsError::InvalidTemplate(_))));

        let result = TemplateBody::from_value(&json!({"content": "x"}));
        assert!(matches!(result, Err(DocsError::InvalidTemplate(_))));
    }

    #[test]
    fn test_template_deserialization() {
        let template: DocumentTemplate = serde_json::from_value(json!({
            "id": "t1",
            "doctor_id": "d1",
            "name": "Sick note",
            "category": "medical_certificate",
            "content": {
                "version": "1.0",
                "variables": ["patient.name"],
                "elements": [],
                "content": "{{patient.name}} is unfit for work."
            }
        }))
        .unwrap();

        assert_eq!(template.category, TemplateCategory::MedicalCertificate);
        assert!(matches!(template.content, TemplateBody::Text(_)));
    }

    #[test]
    fn test_template_with_bad_body_fails_to_load() {
        let result = serde_json::from_value::<DocumentTemplate>(json!({
            "id": "t1", "doctor_id": "d1", "name": "Broken",
            "content": {"version": "1.0", "variables": [], "content": "no elements"}
        }));
        assert!(result.is_err());
    }
}
