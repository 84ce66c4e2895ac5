//! CLI command implementations
//!
//! Exit codes shared by all commands:
//! - 0: success
//! - 2: configuration error
//! - 3: form submission rejected
//! - 4: record not found, or invalid template or input
//! - 5: fatal error

pub mod check_template;
pub mod generate;
pub mod init;
pub mod prefill;
pub mod validate;

use crate::adapters::store::create_record_store;
use crate::config::{load_config, ClinidocConfig};
use crate::core::service::DocumentService;
use crate::domain::{AppointmentId, DocsError, DoctorId, PatientId, TemplateId};
use clap::Args;

/// Record selection shared by `generate` and `prefill`
#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    /// Template to use
    #[arg(short, long)]
    pub template: String,

    /// Patient the document is for
    #[arg(short, long)]
    pub patient: String,

    /// Appointment to draw appointment fields from
    #[arg(short, long)]
    pub appointment: Option<String>,

    /// Place of issue (overrides documents.default_place)
    #[arg(long)]
    pub place: Option<String>,

    /// Acting doctor (overrides documents.default_doctor_id)
    #[arg(short, long, env = "CLINIDOC_DOCTOR")]
    pub doctor: Option<String>,
}

/// Identifiers parsed from [`RecordArgs`]
pub(crate) struct Selection {
    pub doctor_id: DoctorId,
    pub template_id: TemplateId,
    pub patient_id: PatientId,
    pub appointment_id: Option<AppointmentId>,
}

impl RecordArgs {
    pub(crate) fn selection(&self, config: &ClinidocConfig) -> Result<Selection, DocsError> {
        let doctor = self
            .doctor
            .as_deref()
            .or(config.documents.default_doctor_id.as_deref())
            .ok_or_else(|| {
                DocsError::Validation(
                    "no doctor given; pass --doctor or set documents.default_doctor_id"
                        .to_string(),
                )
            })?;

        Ok(Selection {
            doctor_id: DoctorId::new(doctor).map_err(DocsError::Validation)?,
            template_id: TemplateId::new(self.template.as_str()).map_err(DocsError::Validation)?,
            patient_id: PatientId::new(self.patient.as_str()).map_err(DocsError::Validation)?,
            appointment_id: self
                .appointment
                .as_deref()
                .map(AppointmentId::new)
                .transpose()
                .map_err(DocsError::Validation)?,
        })
    }
}

/// Loads configuration and builds a service, printing failures
///
/// Returns the exit code to use when either step fails.
pub(crate) fn open_service(config_path: &str) -> Result<(ClinidocConfig, DocumentService), i32> {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ Failed to load configuration file");
            eprintln!("   Error: {e}");
            return Err(2);
        }
    };

    let store = match create_record_store(&config.store) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("❌ Failed to load records from {}", config.store.records_path);
            eprintln!("   Error: {e}");
            return Err(5);
        }
    };

    let service =
        DocumentService::new(store).with_default_place(config.documents.default_place.clone());
    Ok((config, service))
}

/// Maps a domain error to the command's exit code
pub(crate) fn exit_code_for(error: &DocsError) -> i32 {
    match error {
        DocsError::NotFound(_)
        | DocsError::InvalidTemplate(_)
        | DocsError::InvalidSchema(_)
        | DocsError::Validation(_) => 4,
        DocsError::Configuration(_) => 2,
        _ => 5,
    }
}
