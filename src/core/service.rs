//! Document generation service
//!
//! Ties the record store to the resolvers. Every lookup is scoped to the
//! acting doctor, and form submissions are always checked against prefill
//! data rebuilt from live records.

use super::assemble::assemble_at;
use super::builder::{
    resolve_all, sanitize_submission, BuilderSchema, FieldValues, PrefillData, SubmissionResult,
};
use super::document::{DocumentContent, DocumentOrigin, GeneratedDocument};
use super::template::{DocumentTemplate, TemplateBody};
use super::variables::substitute;
use crate::adapters::render::{RenderBody, RenderPayload, RenderSink};
use crate::adapters::store::RecordStore;
use crate::domain::{
    Appointment, AppointmentId, DocsError, Doctor, DoctorId, DocumentId, NotFoundError, Patient,
    PatientId, RecordKind, Result, TemplateId,
};
use crate::{log_document_generated, log_submission_rejected};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Request to generate one document
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub doctor_id: DoctorId,
    pub template_id: TemplateId,
    pub patient_id: PatientId,
    pub appointment_id: Option<AppointmentId>,
    /// Overrides the service's default place
    pub place: Option<String>,
    /// Client values for form templates; ignored for text templates
    pub submitted: Option<FieldValues>,
    /// Overrides the template name as the document title
    pub title: Option<String>,
}

impl GenerateRequest {
    pub fn new(doctor_id: DoctorId, template_id: TemplateId, patient_id: PatientId) -> Self {
        Self {
            doctor_id,
            template_id,
            patient_id,
            appointment_id: None,
            place: None,
            submitted: None,
            title: None,
        }
    }

    pub fn with_appointment(mut self, appointment_id: AppointmentId) -> Self {
        self.appointment_id = Some(appointment_id);
        self
    }

    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = Some(place.into());
        self
    }

    pub fn with_values(mut self, values: FieldValues) -> Self {
        self.submitted = Some(values);
        self
    }
}

/// Result of a generation attempt
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// The document was produced and saved
    Generated(GeneratedDocument),
    /// The form submission failed validation; nothing was saved
    Rejected(SubmissionResult),
}

/// Initial state of a form for one patient
#[derive(Debug, Clone, PartialEq)]
pub struct PrefilledForm {
    pub template_id: TemplateId,
    pub schema: BuilderSchema,
    pub values: FieldValues,
}

/// Generates documents from templates and practice records
pub struct DocumentService {
    store: Arc<dyn RecordStore>,
    default_place: Option<String>,
}

struct RecordContext {
    doctor: Doctor,
    patient: Option<Patient>,
    appointment: Option<Appointment>,
}

impl DocumentService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            default_place: None,
        }
    }

    /// Place used for `system.place` when a request gives none
    pub fn with_default_place(mut self, place: Option<String>) -> Self {
        self.default_place = place;
        self
    }

    /// Generates a document using the current time
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::NotFound`] when the doctor, template, patient or
    /// appointment does not exist or belongs to another doctor. A form
    /// submission that breaks its rules is not an error: it comes back as
    /// [`GenerationOutcome::Rejected`].
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerationOutcome> {
        self.generate_at(Utc::now(), request).await
    }

    /// Generates a document as of `now`
    ///
    /// # Errors
    ///
    /// See [`DocumentService::generate`].
    pub async fn generate_at(
        &self,
        now: DateTime<Utc>,
        request: GenerateRequest,
    ) -> Result<GenerationOutcome> {
        let template = self
            .load_template(&request.doctor_id, &request.template_id)
            .await?;
        let records = self
            .load_records(
                &request.doctor_id,
                Some(&request.patient_id),
                request.appointment_id.as_ref(),
            )
            .await?;
        let patient = records
            .patient
            .as_ref()
            .ok_or_else(|| NotFoundError::new(RecordKind::Patient, request.patient_id.as_str()))?;

        let document_id = DocumentId::generate();
        let place = request.place.as_deref().or(self.default_place.as_deref());

        tracing::debug!(
            template_id = %template.id,
            format = template.content.format_name(),
            with_appointment = records.appointment.is_some(),
            "Generating document"
        );

        let content = match &template.content {
            TemplateBody::Text(text) => {
                let data = assemble_at(
                    now,
                    &records.doctor,
                    patient,
                    records.appointment.as_ref(),
                    Some(&document_id),
                );
                DocumentContent::Text {
                    body: substitute(&text.content, &data),
                }
            }
            TemplateBody::Form(schema) => {
                let prefill = PrefillData::from_records(
                    now,
                    Some(&records.doctor),
                    Some(patient),
                    records.appointment.as_ref(),
                    place,
                );
                let submitted = match request.submitted {
                    Some(values) => values,
                    None => resolve_all(&schema.elements, &prefill),
                };

                let result = sanitize_submission(schema, &submitted, &prefill)?;
                if !result.valid {
                    log_submission_rejected!(&template.id, &result.errors);
                    return Ok(GenerationOutcome::Rejected(result));
                }

                DocumentContent::Form {
                    elements: schema.elements.clone(),
                    values: result.sanitized_data,
                }
            }
        };

        let format = template.content.format_name();
        let document = GeneratedDocument::new(
            DocumentOrigin {
                id: document_id,
                doctor_id: request.doctor_id,
                patient_id: request.patient_id,
                appointment_id: request.appointment_id,
                template_id: template.id.clone(),
                title: request.title.unwrap_or_else(|| template.name.clone()),
                patient_name: patient.full_name.clone(),
                doctor_name: records.doctor.full_name.clone(),
                created_at: now,
            },
            content,
        )?;

        self.store.save_document(&document).await?;
        log_document_generated!(&document.id, &document.template_id, format);

        Ok(GenerationOutcome::Generated(document))
    }

    /// Initial values for a form template
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::NotFound`] for missing or foreign records and
    /// [`DocsError::InvalidTemplate`] when the template is a text template.
    pub async fn prefill_form(
        &self,
        doctor_id: &DoctorId,
        template_id: &TemplateId,
        patient_id: Option<&PatientId>,
        appointment_id: Option<&AppointmentId>,
        place: Option<&str>,
    ) -> Result<PrefilledForm> {
        self.prefill_form_at(Utc::now(), doctor_id, template_id, patient_id, appointment_id, place)
            .await
    }

    /// Initial values for a form template as of `now`
    ///
    /// # Errors
    ///
    /// See [`DocumentService::prefill_form`].
    pub async fn prefill_form_at(
        &self,
        now: DateTime<Utc>,
        doctor_id: &DoctorId,
        template_id: &TemplateId,
        patient_id: Option<&PatientId>,
        appointment_id: Option<&AppointmentId>,
        place: Option<&str>,
    ) -> Result<PrefilledForm> {
        let template = self.load_template(doctor_id, template_id).await?;
        let TemplateBody::Form(schema) = template.content else {
            return Err(DocsError::InvalidTemplate(format!(
                "template {} is a text template and has no form",
                template_id
            )));
        };

        let prefill = self
            .prefill_data(now, doctor_id, patient_id, appointment_id, place)
            .await?;
        let values = resolve_all(&schema.elements, &prefill);

        Ok(PrefilledForm {
            template_id: template.id,
            schema,
            values,
        })
    }

    /// Checks a submission against a schema using live records
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::NotFound`] for missing or foreign records and
    /// [`DocsError::InvalidSchema`] for a malformed schema.
    pub async fn validate_submission(
        &self,
        doctor_id: &DoctorId,
        schema: &BuilderSchema,
        submitted: &FieldValues,
        patient_id: Option<&PatientId>,
        appointment_id: Option<&AppointmentId>,
        place: Option<&str>,
    ) -> Result<SubmissionResult> {
        let prefill = self
            .prefill_data(Utc::now(), doctor_id, patient_id, appointment_id, place)
            .await?;
        sanitize_submission(schema, submitted, &prefill)
    }

    /// Fetches a previously generated document
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::NotFound`] when no such document exists for the doctor.
    pub async fn get_document(
        &self,
        doctor_id: &DoctorId,
        document_id: &DocumentId,
    ) -> Result<GeneratedDocument> {
        self.store
            .get_document(doctor_id, document_id)
            .await?
            .ok_or_else(|| NotFoundError::new(RecordKind::Document, document_id.as_str()).into())
    }

    /// What a rendering sink receives for a document
    pub fn render_payload(document: &GeneratedDocument) -> RenderPayload<'_> {
        let body = match &document.content {
            DocumentContent::Text { body } => RenderBody::Text(body),
            DocumentContent::Form { elements, values } => RenderBody::Form { elements, values },
        };

        RenderPayload {
            title: &document.title,
            document_id: &document.id,
            patient_name: document.patient_name.as_deref(),
            doctor_name: document.doctor_name.as_deref(),
            created_at: document.created_at,
            body,
        }
    }

    /// Renders a document through a sink
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::Validation`] if the document's checksum no longer
    /// matches its content, or any error from the sink.
    pub fn render(document: &GeneratedDocument, sink: &dyn RenderSink) -> Result<String> {
        if !document.verify_checksum()? {
            return Err(DocsError::Validation(format!(
                "checksum mismatch for document {}",
                document.id
            )));
        }
        sink.render(&Self::render_payload(document))
    }

    async fn prefill_data(
        &self,
        now: DateTime<Utc>,
        doctor_id: &DoctorId,
        patient_id: Option<&PatientId>,
        appointment_id: Option<&AppointmentId>,
        place: Option<&str>,
    ) -> Result<PrefillData> {
        let records = self
            .load_records(doctor_id, patient_id, appointment_id)
            .await?;
        let place = place.or(self.default_place.as_deref());

        Ok(PrefillData::from_records(
            now,
            Some(&records.doctor),
            records.patient.as_ref(),
            records.appointment.as_ref(),
            place,
        ))
    }

    async fn load_template(
        &self,
        doctor_id: &DoctorId,
        template_id: &TemplateId,
    ) -> Result<DocumentTemplate> {
        self.store
            .get_template(doctor_id, template_id)
            .await?
            .ok_or_else(|| NotFoundError::new(RecordKind::Template, template_id.as_str()).into())
    }

    async fn load_records(
        &self,
        doctor_id: &DoctorId,
        patient_id: Option<&PatientId>,
        appointment_id: Option<&AppointmentId>,
    ) -> Result<RecordContext> {
        let doctor = self
            .store
            .get_doctor(doctor_id)
            .await?
            .ok_or_else(|| NotFoundError::new(RecordKind::Doctor, doctor_id.as_str()))?;

        let patient = match patient_id {
            Some(id) => Some(
                self.store
                    .get_patient(doctor_id, id)
                    .await?
                    .ok_or_else(|| NotFoundError::new(RecordKind::Patient, id.as_str()))?,
            ),
            None => None,
        };

        let appointment = match appointment_id {
            Some(id) => {
                let appointment = self
                    .store
                    .get_appointment(doctor_id, id)
                    .await?
                    .ok_or_else(|| NotFoundError::new(RecordKind::Appointment, id.as_str()))?;

                // An appointment for a different patient is treated as missing.
                if let Some(patient) = &patient {
                    if appointment.patient_id != patient.id {
                        return Err(NotFoundError::new(RecordKind::Appointment, id.as_str()).into());
                    }
                }
                Some(appointment)
            }
            None => None,
        };

        Ok(RecordContext {
            doctor,
            patient,
            appointment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::render::TextRenderer;
    use crate::adapters::store::{MemoryRecordStore, RecordSet};
    use crate::core::builder::BuilderSchema;
    use crate::core::content::TemplateContent;
    use crate::core::template::TemplateCategory;
    use chrono::{NaiveDate, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()
    }

    fn d(id: &str) -> DoctorId {
        DoctorId::new(id).unwrap()
    }

    fn intake_schema() -> BuilderSchema {
        BuilderSchema::parse(&json!({
            "version": 2,
            "elements": [
                {"id": "e1", "type": "text", "label": "Full name", "name": "patient_name",
                 "required": true,
                 "prefill": {"enabled": true, "source": "patient", "field": "patient_name", "readonly": true}},
                {"id": "e2", "type": "text", "label": "Reason", "name": "reason", "required": true},
                {"id": "e3", "type": "date", "label": "Issued", "name": "issued",
                 "properties": {"useCurrentDate": true}}
            ]
        }))
        .unwrap()
    }

    fn records() -> RecordSet {
        let mut doctor = Doctor::new(d("d1"));
        doctor.full_name = Some("Dr. Amal Haddad".to_string());

        let mut patient = Patient::new(PatientId::new("p1").unwrap(), d("d1"));
        patient.full_name = Some("Jane Doe".to_string());
        patient.date_of_birth = NaiveDate::from_ymd_opt(2000, 3, 11);

        let other = Patient::new(PatientId::new("p2").unwrap(), d("d1"));

        let appointment = Appointment {
            id: AppointmentId::new("a1").unwrap(),
            doctor_id: d("d1"),
            patient_id: PatientId::new("p2").unwrap(),
            appointment_date: Utc.with_ymd_and_hms(2024, 3, 12, 14, 30, 0).unwrap(),
            duration_minutes: None,
            status: None,
            chief_complaint: None,
            diagnosis: None,
            notes: None,
        };

        RecordSet {
            doctors: vec![doctor, Doctor::new(d("d2"))],
            patients: vec![patient, other],
            appointments: vec![appointment],
            templates: vec![
                DocumentTemplate {
                    id: TemplateId::new("letter").unwrap(),
                    doctor_id: d("d1"),
                    name: "Letter".to_string(),
                    category: TemplateCategory::Other,
                    description: None,
                    content: TemplateBody::Text(TemplateContent::from_text(
                        "Dear {{patient.name}}, age {{patient.age}}, {{appointment.date}}",
                    )),
                },
                DocumentTemplate {
                    id: TemplateId::new("intake").unwrap(),
                    doctor_id: d("d1"),
                    name: "Intake".to_string(),
                    category: TemplateCategory::Other,
                    description: None,
                    content: TemplateBody::Form(intake_schema()),
                },
            ],
        }
    }

    fn service() -> DocumentService {
        DocumentService::new(Arc::new(MemoryRecordStore::new(records())))
    }

    fn request(template: &str) -> GenerateRequest {
        GenerateRequest::new(
            d("d1"),
            TemplateId::new(template).unwrap(),
            PatientId::new("p1").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_generate_text_document() {
        let outcome = service().generate_at(now(), request("letter")).await.unwrap();

        let GenerationOutcome::Generated(document) = outcome else {
            panic!("expected a generated document");
        };
        assert_eq!(
            document.content,
            DocumentContent::Text {
                body: "Dear Jane Doe, age 23, [Not provided]".to_string()
            }
        );
        assert_eq!(document.title, "Letter");
        assert!(document.verify_checksum().unwrap());
    }

    #[tokio::test]
    async fn test_generate_form_replaces_tampered_locked_value() {
        let mut values = FieldValues::new();
        values.insert("patient_name".to_string(), json!("TAMPERED"));
        values.insert("reason".to_string(), json!("Check-up"));

        let outcome = service()
            .generate_at(now(), request("intake").with_values(values))
            .await
            .unwrap();

        let GenerationOutcome::Generated(document) = outcome else {
            panic!("expected a generated document");
        };
        let DocumentContent::Form { values, .. } = &document.content else {
            panic!("expected form content");
        };
        assert_eq!(values["patient_name"], json!("Jane Doe"));
        assert_eq!(values["issued"], json!("2024-03-10"));
    }

    #[tokio::test]
    async fn test_generate_form_without_values_is_rejected() {
        let outcome = service().generate_at(now(), request("intake")).await.unwrap();

        let GenerationOutcome::Rejected(result) = outcome else {
            panic!("expected a rejection");
        };
        assert_eq!(result.errors, vec!["Reason is required".to_string()]);
        assert_eq!(result.sanitized_data["patient_name"], json!("Jane Doe"));
    }

    #[tokio::test]
    async fn test_foreign_template_is_not_found() {
        let mut request = request("letter");
        request.doctor_id = d("d2");
        let err = service().generate_at(now(), request).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_appointment_for_other_patient_is_not_found() {
        let request = request("letter").with_appointment(AppointmentId::new("a1").unwrap());
        let err = service().generate_at(now(), request).await.unwrap_err();
        assert_eq!(err.to_string(), "Appointment not found: a1");
    }

    #[tokio::test]
    async fn test_prefill_form() {
        let form = service()
            .with_default_place(Some("Riverside".to_string()))
            .prefill_form_at(
                now(),
                &d("d1"),
                &TemplateId::new("intake").unwrap(),
                Some(&PatientId::new("p1").unwrap()),
                None,
                None,
            )
            .await
            .unwrap();

        assert_eq!(form.values["patient_name"], json!("Jane Doe"));
        assert_eq!(form.values["issued"], json!("2024-03-10"));
        assert!(!form.values.contains_key("reason"));
    }

    #[tokio::test]
    async fn test_prefill_text_template_is_invalid() {
        let result = service()
            .prefill_form(&d("d1"), &TemplateId::new("letter").unwrap(), None, None, None)
            .await;
        assert!(matches!(result, Err(DocsError::InvalidTemplate(_))));
    }

    #[tokio::test]
    async fn test_validate_submission_uses_live_records() {
        let mut values = FieldValues::new();
        values.insert("patient_name".to_string(), json!("Someone Else"));
        values.insert("reason".to_string(), json!("Follow-up"));

        let result = service()
            .validate_submission(
                &d("d1"),
                &intake_schema(),
                &values,
                Some(&PatientId::new("p1").unwrap()),
                None,
                None,
            )
            .await
            .unwrap();

        assert!(result.valid);
        assert_eq!(result.sanitized_data["patient_name"], json!("Jane Doe"));
    }

    #[tokio::test]
    async fn test_generated_document_is_saved_and_renders() {
        let service = service();
        let GenerationOutcome::Generated(document) =
            service.generate_at(now(), request("letter")).await.unwrap()
        else {
            panic!("expected a generated document");
        };

        let stored = service.get_document(&d("d1"), &document.id).await.unwrap();
        assert_eq!(stored, document);

        let rendered = DocumentService::render(&stored, &TextRenderer::default()).unwrap();
        assert_eq!(rendered, "Dear Jane Doe, age 23, [Not provided]\n");
    }

    #[tokio::test]
    async fn test_render_rejects_tampered_document() {
        let service = service();
        let GenerationOutcome::Generated(mut document) =
            service.generate_at(now(), request("letter")).await.unwrap()
        else {
            panic!("expected a generated document");
        };
        document.content = DocumentContent::Text {
            body: "edited".to_string(),
        };

        let result = DocumentService::render(&document, &TextRenderer::default());
        assert!(matches!(result, Err(DocsError::Validation(_))));
    }
}
