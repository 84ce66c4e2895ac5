//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers that flow through document
//! generation. Each type refuses empty input, so an id that made it into the
//! domain is always usable as a lookup key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, rejecting empty or blank strings
            pub fn new(id: impl Into<String>) -> Result<Self, String> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(concat!($label, " cannot be empty").to_string());
                }
                Ok(Self(id))
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes self and returns the inner String
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifier of a doctor (the acting, authenticated user)
    ///
    /// ```
    /// use clinidoc::domain::ids::DoctorId;
    ///
    /// let doctor = DoctorId::new("doc-1").unwrap();
    /// assert_eq!(doctor.as_str(), "doc-1");
    /// ```
    DoctorId,
    "Doctor ID"
);

define_id!(
    /// Identifier of a patient record
    PatientId,
    "Patient ID"
);

define_id!(
    /// Identifier of an appointment record
    AppointmentId,
    "Appointment ID"
);

define_id!(
    /// Identifier of a document template
    TemplateId,
    "Template ID"
);

define_id!(
    /// Identifier of a generated document
    DocumentId,
    "Document ID"
);

impl DocumentId {
    /// Generates a fresh random document identifier (UUID v4)
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}
