//! Record store abstraction
//!
//! Document generation needs records fetched by id and scoped to the acting
//! doctor. Implementations return `Ok(None)` both when a record does not
//! exist and when it belongs to another doctor; callers cannot tell the
//! two apart.

use crate::core::document::GeneratedDocument;
use crate::core::template::DocumentTemplate;
use crate::domain::{
    Appointment, AppointmentId, Doctor, DoctorId, DocumentId, Patient, PatientId, Result,
    TemplateId,
};
use async_trait::async_trait;

/// Owner-scoped access to practice records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the acting doctor's own record
    async fn get_doctor(&self, doctor_id: &DoctorId) -> Result<Option<Doctor>>;

    /// Fetch a patient owned by `doctor_id`
    async fn get_patient(
        &self,
        doctor_id: &DoctorId,
        patient_id: &PatientId,
    ) -> Result<Option<Patient>>;

    /// Fetch an appointment owned by `doctor_id`
    async fn get_appointment(
        &self,
        doctor_id: &DoctorId,
        appointment_id: &AppointmentId,
    ) -> Result<Option<Appointment>>;

    /// Fetch a template owned by `doctor_id`
    async fn get_template(
        &self,
        doctor_id: &DoctorId,
        template_id: &TemplateId,
    ) -> Result<Option<DocumentTemplate>>;

    /// Fetch a generated document owned by `doctor_id`
    async fn get_document(
        &self,
        doctor_id: &DoctorId,
        document_id: &DocumentId,
    ) -> Result<Option<GeneratedDocument>>;

    /// Persist a generated document
    ///
    /// # Errors
    ///
    /// Returns a store error if a document with the same id already exists
    /// or the write fails.
    async fn save_document(&self, document: &GeneratedDocument) -> Result<()>;
}
