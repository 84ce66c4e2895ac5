//! Core business logic for Clinidoc.
//!
//! # Modules
//!
//! - [`variables`] - `{{path}}` substitution for text templates
//! - [`assemble`] - builds the variable data for one document from records
//! - [`content`] - text template content and its structural check
//! - [`builder`] - form schemas, prefill and submission checks
//! - [`template`] - stored templates in either format
//! - [`document`] - generated documents
//! - [`checksum`] - content checksums for generated documents
//! - [`service`] - end-to-end generation over a record store
//!
//! # Generation Workflow
//!
//! 1. **Load**: fetch the template and the doctor, patient and appointment records
//! 2. **Resolve**: substitute placeholders (text) or sanitize the submission (form)
//! 3. **Seal**: build the document and checksum its content
//! 4. **Save**: hand the document to the record store
//!
//! # Example
//!
//! ```rust,no_run
//! use clinidoc::adapters::store::MemoryRecordStore;
//! use clinidoc::core::service::{DocumentService, GenerateRequest, GenerationOutcome};
//! use clinidoc::domain::{DoctorId, PatientId, TemplateId};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryRecordStore::from_file("records.json")?;
//! let service = DocumentService::new(Arc::new(store));
//!
//! let request = GenerateRequest::new(
//!     DoctorId::new("doc-001")?,
//!     TemplateId::new("referral")?,
//!     PatientId::new("pat-001")?,
//! );
//!
//! match service.generate(request).await? {
//!     GenerationOutcome::Generated(document) => println!("Generated {}", document.id),
//!     GenerationOutcome::Rejected(result) => println!("Rejected: {:?}", result.errors),
//! }
//! # Ok(())
//! # }
//! ```

pub mod assemble;
pub mod builder;
pub mod checksum;
pub mod content;
pub mod document;
pub mod service;
pub mod template;
pub mod variables;
