//! In-memory record store
//!
//! Holds a fixed set of doctors, patients, appointments and templates,
//! typically loaded from a JSON fixture file, plus the documents generated
//! while the process runs.
//!
//! Fixture layout:
//!
//! ```json
//! {
//!   "doctors": [{"id": "d1", "full_name": "Dr. Amal Haddad"}],
//!   "patients": [{"id": "p1", "doctor_id": "d1", "full_name": "Jane Doe"}],
//!   "appointments": [],
//!   "templates": []
//! }
//! ```

use super::traits::RecordStore;
use crate::core::document::GeneratedDocument;
use crate::core::template::DocumentTemplate;
use crate::domain::context::ResultExt;
use crate::domain::{
    Appointment, AppointmentId, Doctor, DoctorId, DocumentId, Patient, PatientId, Result,
    StoreError, TemplateId,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::RwLock;

/// Records held by a [`MemoryRecordStore`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default)]
    pub doctors: Vec<Doctor>,
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    #[serde(default)]
    pub templates: Vec<DocumentTemplate>,
}

/// Record store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RecordSet,
    documents: RwLock<Vec<GeneratedDocument>>,
}

impl MemoryRecordStore {
    /// Creates a store over the given records
    pub fn new(records: RecordSet) -> Self {
        Self {
            records,
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Loads a store from a JSON fixture file
    ///
    /// Templates are parsed and checked while loading, so a fixture with a
    /// malformed template is rejected as a whole.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid record set.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| StoreError::LoadFailed(format!("{}: {}", path.display(), e)))?;

        let records: RecordSet = serde_json::from_str(&contents)
            .map_err(|e| StoreError::InvalidData(e.to_string()))
            .with_context(|| format!("Failed to parse record file {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            doctors = records.doctors.len(),
            patients = records.patients.len(),
            appointments = records.appointments.len(),
            templates = records.templates.len(),
            "Loaded record store"
        );

        Ok(Self::new(records))
    }

    /// Number of documents saved so far
    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get_doctor(&self, doctor_id: &DoctorId) -> Result<Option<Doctor>> {
        Ok(self
            .records
            .doctors
            .iter()
            .find(|d| &d.id == doctor_id)
            .cloned())
    }

    async fn get_patient(
        &self,
        doctor_id: &DoctorId,
        patient_id: &PatientId,
    ) -> Result<Option<Patient>> {
        Ok(self
            .records
            .patients
            .iter()
            .find(|p| &p.id == patient_id && &p.doctor_id == doctor_id)
            .cloned())
    }

    async fn get_appointment(
        &self,
        doctor_id: &DoctorId,
        appointment_id: &AppointmentId,
    ) -> Result<Option<Appointment>> {
        Ok(self
            .records
            .appointments
            .iter()
            .find(|a| &a.id == appointment_id && &a.doctor_id == doctor_id)
            .cloned())
    }

    async fn get_template(
        &self,
        doctor_id: &DoctorId,
        template_id: &TemplateId,
    ) -> Result<Option<DocumentTemplate>> {
        Ok(self
            .records
            .templates
            .iter()
            .find(|t| &t.id == template_id && &t.doctor_id == doctor_id)
            .cloned())
    }

    async fn get_document(
        &self,
        doctor_id: &DoctorId,
        document_id: &DocumentId,
    ) -> Result<Option<GeneratedDocument>> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .find(|d| &d.id == document_id && &d.doctor_id == doctor_id)
            .cloned())
    }

    async fn save_document(&self, document: &GeneratedDocument) -> Result<()> {
        let mut documents = self.documents.write().await;
        if documents.iter().any(|d| d.id == document.id) {
            return Err(StoreError::Conflict(format!("document {} already exists", document.id)).into());
        }
        documents.push(document.clone());

        tracing::debug!(document_id = %document.id, "Saved generated document");
        Ok(())
    }
}
