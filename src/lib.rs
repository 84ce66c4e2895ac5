// Clinidoc - Clinical Document Generation
// Copyright (c) 2025 Clinidoc Contributors
// Licensed under the MIT License

//! # Clinidoc - Clinical Document Generation
//!
//! Clinidoc turns document templates and practice records into finished
//! clinical documents: referral letters, certificates, prescriptions and
//! intake forms.
//!
//! ## Overview
//!
//! Two template formats are supported:
//! - **Text templates** (version "1.0"): a body with `{{path}}` placeholders
//!   filled from the doctor, patient, appointment and document data
//! - **Form templates** (version 2): a list of builder elements whose values
//!   can be prefilled from records and are checked on submission
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Templates, documents, resolution and the generation service
//! - [`adapters`] - Record storage and rendering sinks
//! - [`domain`] - Identifiers, records and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use clinidoc::core::assemble::assemble;
//! use clinidoc::core::variables::substitute;
//! use clinidoc::domain::{Doctor, DoctorId, Patient, PatientId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doctor_id = DoctorId::new("doc-001")?;
//! let mut doctor = Doctor::new(doctor_id.clone());
//! doctor.full_name = Some("Dr. Amal Haddad".to_string());
//!
//! let mut patient = Patient::new(PatientId::new("pat-001")?, doctor_id);
//! patient.full_name = Some("Jane Doe".to_string());
//!
//! let data = assemble(&doctor, &patient, None, None);
//! let letter = substitute("Dear {{patient.name}}, {{doctor.name}} {{appointment.date}}", &data);
//! assert_eq!(letter, "Dear Jane Doe, Dr. Amal Haddad [Not provided]");
//! # Ok(())
//! # }
//! ```
//!
//! ## Form Submissions
//!
//! Locked (prefilled, read-only) fields are always rebuilt from records on
//! the server. Whatever a client sends for them is discarded:
//!
//! ```rust
//! use clinidoc::core::builder::{sanitize_submission, BuilderSchema, FieldValues, PrefillData};
//! use clinidoc::domain::{Patient, PatientId, DoctorId};
//! use chrono::Utc;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = BuilderSchema::parse(&json!({
//!     "version": 2,
//!     "elements": [{
//!         "id": "e1", "type": "text", "label": "Full name", "name": "patient_name",
//!         "prefill": {"enabled": true, "source": "patient", "field": "patient_name", "readonly": true}
//!     }]
//! }))?;
//!
//! let mut patient = Patient::new(PatientId::new("pat-001")?, DoctorId::new("doc-001")?);
//! patient.full_name = Some("Jane Doe".to_string());
//! let prefill = PrefillData::from_records(Utc::now(), None, Some(&patient), None, None);
//!
//! let mut submitted = FieldValues::new();
//! submitted.insert("patient_name".to_string(), json!("TAMPERED"));
//!
//! let result = sanitize_submission(&schema, &submitted, &prefill)?;
//! assert_eq!(result.sanitized_data["patient_name"], json!("Jane Doe"));
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
