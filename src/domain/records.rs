//! Practice records
//!
//! Doctor, patient and appointment records as supplied by the record store.
//! Every descriptive field is optional: source data is often incomplete, and
//! document generation must still succeed when it is.

use super::ids::{AppointmentId, DoctorId, PatientId};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A doctor (the owner of patients, appointments and templates)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    pub id: DoctorId,

    #[serde(default)]
    pub full_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub specialization: Option<String>,

    #[serde(default)]
    pub clinic_name: Option<String>,

    #[serde(default)]
    pub clinic_address: Option<String>,

    #[serde(default)]
    pub license_number: Option<String>,
}

impl Doctor {
    /// Creates a doctor record with only an identifier
    pub fn new(id: DoctorId) -> Self {
        Self {
            id,
            full_name: None,
            email: None,
            phone: None,
            specialization: None,
            clinic_name: None,
            clinic_address: None,
            license_number: None,
        }
    }
}

/// A patient belonging to exactly one doctor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id: PatientId,

    /// Owning doctor; lookups are scoped by this field
    pub doctor_id: DoctorId,

    #[serde(default)]
    pub full_name: Option<String>,

    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,

    #[serde(default)]
    pub gender: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub blood_type: Option<String>,

    #[serde(default)]
    pub allergies: Option<String>,

    #[serde(default)]
    pub emergency_contact: Option<String>,
}

impl Patient {
    /// Creates a patient record with only identifiers
    pub fn new(id: PatientId, doctor_id: DoctorId) -> Self {
        Self {
            id,
            doctor_id,
            full_name: None,
            date_of_birth: None,
            gender: None,
            phone: None,
            email: None,
            address: None,
            blood_type: None,
            allergies: None,
            emergency_contact: None,
        }
    }

    /// Age in full years on the given day, if the date of birth is known
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use clinidoc::domain::records::Patient;
    /// use clinidoc::domain::ids::{DoctorId, PatientId};
    ///
    /// let mut patient = Patient::new(PatientId::new("p1").unwrap(), DoctorId::new("d1").unwrap());
    /// patient.date_of_birth = NaiveDate::from_ymd_opt(2000, 3, 11);
    ///
    /// let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    /// assert_eq!(patient.age_on(today), Some(23));
    /// ```
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.date_of_birth.map(|dob| calendar_age(dob, today))
    }
}

/// Full years between `birth` and `today`
///
/// One year is subtracted when this year's birthday has not happened yet.
/// A birth date in the future yields zero.
pub fn calendar_age(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    u32::try_from(age).unwrap_or(0)
}

/// An appointment between a doctor and one of their patients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: AppointmentId,

    /// Owning doctor; lookups are scoped by this field
    pub doctor_id: DoctorId,

    pub patient_id: PatientId,

    /// Single timestamp from which the date and time strings are derived
    pub appointment_date: DateTime<Utc>,

    #[serde(default)]
    pub duration_minutes: Option<u32>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub chief_complaint: Option<String>,

    #[serde(default)]
    pub diagnosis: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test_case(date(2000, 3, 11), date(2024, 3, 10), 23 ; "day before birthday")]
    #[test_case(date(2000, 3, 10), date(2024, 3, 10), 24 ; "on birthday")]
    #[test_case(date(2000, 12, 31), date(2024, 1, 1), 23 ; "earlier month")]
    #[test_case(date(2000, 1, 1), date(2024, 12, 31), 24 ; "later month")]
    #[test_case(date(2024, 5, 1), date(2024, 3, 10), 0 ; "born in the future")]
    fn test_calendar_age(birth: NaiveDate, today: NaiveDate, expected: u32) {
        assert_eq!(calendar_age(birth, today), expected);
    }

    #[test]
    fn test_age_without_date_of_birth() {
        let patient = Patient::new(PatientId::new("p1").unwrap(), DoctorId::new("d1").unwrap());
        assert_eq!(patient.age_on(date(2024, 3, 10)), None);
    }

    #[test]
    fn test_patient_deserialization_defaults_missing_fields() {
        let patient: Patient = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "doctor_id": "d1",
            "full_name": "Jane Doe",
            "date_of_birth": "1990-04-02"
        }))
        .unwrap();

        assert_eq!(patient.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(patient.date_of_birth, Some(date(1990, 4, 2)));
        assert!(patient.phone.is_none());
    }

    #[test]
    fn test_appointment_deserialization() {
        let appointment: Appointment = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "doctor_id": "d1",
            "patient_id": "p1",
            "appointment_date": "2024-03-10T14:30:00Z",
            "duration_minutes": 30
        }))
        .unwrap();

        assert_eq!(appointment.duration_minutes, Some(30));
        assert!(appointment.diagnosis.is_none());
    }
}
