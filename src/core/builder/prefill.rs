//! Prefill resolution for builder forms
//!
//! Computes initial values for elements that declare a prefill source, and
//! today's date for date elements with `useCurrentDate`. The result is
//! sparse: elements without a resolvable value get no entry at all.

use super::schema::{BuilderElement, ElementKind, PrefillConfig, PrefillSource};
use crate::domain::records::{Appointment, Doctor, Patient};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field name to value map, ordered by field name
pub type FieldValues = BTreeMap<String, Value>;

/// Form date format (`YYYY-MM-DD`)
pub const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// Form time format (`HH:MM`, 24-hour)
pub const FORM_TIME_FORMAT: &str = "%H:%M";

/// Resolution context for builder prefill
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrefillData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<PatientPrefill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor: Option<DoctorPrefill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment: Option<AppointmentPrefill>,
    pub system: SystemPrefill,
    /// Date used for `useCurrentDate` elements and calculations
    pub today: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientPrefill {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DoctorPrefill {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinic: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppointmentPrefill {
    pub id: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SystemPrefill {
    pub current_date: String,
    pub current_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
}

impl PrefillData {
    /// Builds prefill data from live records as of `now`
    pub fn from_records(
        now: DateTime<Utc>,
        doctor: Option<&Doctor>,
        patient: Option<&Patient>,
        appointment: Option<&Appointment>,
        place: Option<&str>,
    ) -> Self {
        let today = now.date_naive();

        Self {
            patient: patient.map(|p| PatientPrefill {
                id: p.id.to_string(),
                name: p.full_name.clone(),
                phone: p.phone.clone(),
                email: p.email.clone(),
                age: p.age_on(today),
                gender: p.gender.clone(),
            }),
            doctor: doctor.map(|d| DoctorPrefill {
                id: d.id.to_string(),
                name: d.full_name.clone(),
                clinic: d.clinic_name.clone(),
            }),
            appointment: appointment.map(|a| AppointmentPrefill {
                id: a.id.to_string(),
                date: a.appointment_date.format(FORM_DATE_FORMAT).to_string(),
                time: a.appointment_date.format(FORM_TIME_FORMAT).to_string(),
            }),
            system: SystemPrefill {
                current_date: today.format(FORM_DATE_FORMAT).to_string(),
                current_time: now.format(FORM_TIME_FORMAT).to_string(),
                place: place.map(str::to_string),
            },
            today,
        }
    }

    fn lookup(&self, source: PrefillSource, key: &str) -> Option<Value> {
        let text = |v: &Option<String>| v.clone().map(Value::String);

        match source {
            PrefillSource::Patient => {
                let p = self.patient.as_ref()?;
                match key {
                    "id" => Some(Value::String(p.id.clone())),
                    "name" => text(&p.name),
                    "phone" => text(&p.phone),
                    "email" => text(&p.email),
                    "age" => p.age.map(Value::from),
                    "gender" => text(&p.gender),
                    _ => None,
                }
            }
            PrefillSource::Doctor => {
                let d = self.doctor.as_ref()?;
                match key {
                    "id" => Some(Value::String(d.id.clone())),
                    "name" => text(&d.name),
                    "clinic" => text(&d.clinic),
                    _ => None,
                }
            }
            PrefillSource::Appointment => {
                let a = self.appointment.as_ref()?;
                match key {
                    "id" => Some(Value::String(a.id.clone())),
                    "date" => Some(Value::String(a.date.clone())),
                    "time" => Some(Value::String(a.time.clone())),
                    _ => None,
                }
            }
            PrefillSource::System => match key {
                "current_date" => Some(Value::String(self.system.current_date.clone())),
                "current_time" => Some(Value::String(self.system.current_time.clone())),
                "place" => text(&self.system.place),
                _ => None,
            },
        }
    }
}

/// Resolves the value a prefill configuration points at
///
/// Returns `None` when the section or field is absent, or when the field is
/// not part of the source's vocabulary.
pub fn resolve_value(data: &PrefillData, config: &PrefillConfig) -> Option<Value> {
    data.lookup(config.source, config.source.field_key(&config.field))
}

/// Initial value of a single element, if it has one
pub fn resolve_element(element: &BuilderElement, data: &PrefillData) -> Option<Value> {
    if let ElementKind::Date {
        use_current_date: true,
    } = element.kind
    {
        return Some(Value::String(data.today.format(FORM_DATE_FORMAT).to_string()));
    }

    match &element.prefill {
        Some(config) if config.enabled => resolve_value(data, config),
        _ => None,
    }
}

/// Initial values for every element that has one
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use clinidoc::core::builder::{resolve_all, BuilderSchema, PrefillData};
/// use serde_json::json;
///
/// let schema = BuilderSchema::parse(&json!({
///     "version": 2,
///     "elements": [
///         {"id": "1", "type": "date", "name": "issued", "properties": {"useCurrentDate": true}},
///         {"id": "2", "type": "text", "name": "notes"}
///     ]
/// })).unwrap();
///
/// let now = Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
/// let data = PrefillData::from_records(now, None, None, None, None);
/// let values = resolve_all(&schema.elements, &data);
///
/// assert_eq!(values["issued"], "2024-03-10");
/// assert!(!values.contains_key("notes"));
/// ```
pub fn resolve_all(elements: &[BuilderElement], data: &PrefillData) -> FieldValues {
    let mut values = FieldValues::new();

    for element in elements.iter().filter(|e| e.kind.holds_value()) {
        if let Some(value) = resolve_element(element, data) {
            values.insert(element.name.clone(), value);
        }
    }

    tracing::debug!(
        elements = elements.len(),
        prefilled = values.len(),
        "Resolved prefill values"
    );

    values
}
