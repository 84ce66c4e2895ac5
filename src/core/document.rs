//! Generated document model
//!
//! A generated document holds a resolved copy of its template's content, not
//! a reference to the template, so later template edits never change it.

use super::builder::{BuilderElement, FieldValues};
use super::checksum::calculate_checksum;
use crate::domain::ids::{AppointmentId, DoctorId, DocumentId, PatientId, TemplateId};
use crate::domain::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resolved content of a generated document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum DocumentContent {
    /// Fully substituted text
    Text { body: String },
    /// Builder elements with their sanitized values
    Form {
        elements: Vec<BuilderElement>,
        values: FieldValues,
    },
}

/// A document produced from a template for one patient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedDocument {
    pub id: DocumentId,
    pub doctor_id: DoctorId,
    pub patient_id: PatientId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<AppointmentId>,
    pub template_id: TemplateId,
    pub title: String,
    /// Names as they were when the document was generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    pub content: DocumentContent,
    /// SHA-256 of the canonical JSON form of `content`
    pub checksum: String,
    pub created_at: DateTime<Utc>,
}

/// Identity of a document being created
#[derive(Debug, Clone)]
pub struct DocumentOrigin {
    pub id: DocumentId,
    pub doctor_id: DoctorId,
    pub patient_id: PatientId,
    pub appointment_id: Option<AppointmentId>,
    pub template_id: TemplateId,
    pub title: String,
    pub patient_name: Option<String>,
    pub doctor_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl GeneratedDocument {
    /// Creates a document and stamps its checksum
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be serialized.
    pub fn new(origin: DocumentOrigin, content: DocumentContent) -> Result<Self> {
        let checksum = content_checksum(&content)?;
        Ok(Self {
            id: origin.id,
            doctor_id: origin.doctor_id,
            patient_id: origin.patient_id,
            appointment_id: origin.appointment_id,
            template_id: origin.template_id,
            title: origin.title,
            patient_name: origin.patient_name,
            doctor_name: origin.doctor_name,
            content,
            checksum,
            created_at: origin.created_at,
        })
    }

    /// Whether the stored checksum still matches the content
    pub fn verify_checksum(&self) -> Result<bool> {
        Ok(content_checksum(&self.content)? == self.checksum)
    }
}

fn content_checksum(content: &DocumentContent) -> Result<String> {
    calculate_checksum(&serde_json::to_value(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> DocumentOrigin {
        DocumentOrigin {
            id: DocumentId::new("doc-1").unwrap(),
            doctor_id: DoctorId::new("d1").unwrap(),
            patient_id: PatientId::new("p1").unwrap(),
            appointment_id: None,
            template_id: TemplateId::new("t1").unwrap(),
            title: "Sick note".to_string(),
            patient_name: Some("Jane Doe".to_string()),
            doctor_name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_checksum_verifies() {
        let doc = GeneratedDocument::new(
            origin(),
            DocumentContent::Text {
                body: "Jane Doe is unfit for work.".to_string(),
            },
        )
        .unwrap();

        assert_eq!(doc.checksum.len(), 64);
        assert!(doc.verify_checksum().unwrap());
    }

    #[test]
    fn test_tampered_content_fails_verification() {
        let mut doc = GeneratedDocument::new(
            origin(),
            DocumentContent::Text {
                body: "original".to_string(),
            },
        )
        .unwrap();
        doc.content = DocumentContent::Text {
            body: "edited".to_string(),
        };

        assert!(!doc.verify_checksum().unwrap());
    }

    #[test]
    fn test_content_serialization_tag() {
        let content = DocumentContent::Form {
            elements: Vec::new(),
            values: FieldValues::new(),
        };
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["format"], "form");
    }
}
