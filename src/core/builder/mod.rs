//! Builder forms (version 2 templates)
//!
//! - [`schema`] - element model and structural validation
//! - [`prefill`] - initial values from patient, doctor, appointment and system data
//! - [`submission`] - server-side enforcement of locked fields and validation rules

pub mod prefill;
pub mod schema;
pub mod submission;

pub use prefill::{resolve_all, resolve_element, resolve_value, FieldValues, PrefillData};
pub use schema::{
    BuilderElement, BuilderSchema, Calculation, CalculationKind, ElementKind, ElementType,
    GridPosition, PrefillConfig, PrefillSource, ValidationRules,
};
pub use submission::{sanitize_submission, SubmissionResult};
