//! Domain models and types for Clinidoc.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`DoctorId`], [`PatientId`], [`AppointmentId`],
//!   [`TemplateId`], [`DocumentId`])
//! - **Practice records** ([`Doctor`], [`Patient`], [`Appointment`])
//! - **Error types** ([`DocsError`], [`NotFoundError`], [`StoreError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers are newtypes, so a patient id cannot be passed where an
//! appointment id is expected:
//!
//! ```rust
//! use clinidoc::domain::{AppointmentId, PatientId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let patient_id = PatientId::new("patient-123")?;
//! let appointment_id = AppointmentId::new("appointment-456")?;
//!
//! // let wrong: PatientId = appointment_id;  // Compile error!
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod errors;
pub mod ids;
pub mod records;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{DocsError, NotFoundError, RecordKind, StoreError};
pub use ids::{AppointmentId, DocumentId, DoctorId, PatientId, TemplateId};
pub use records::{Appointment, Doctor, Patient};
pub use result::Result;
