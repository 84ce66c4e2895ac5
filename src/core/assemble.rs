//! Document data assembly
//!
//! Builds the [`DocumentData`] bag that text templates are resolved against.
//! The bag has four sections: `doctor`, `patient`, `appointment` (only when an
//! appointment is linked) and `document`. Fields missing from the source
//! records stay absent so that substitution falls back to the sentinel.

use super::variables::VariableSource;
use crate::domain::ids::DocumentId;
use crate::domain::records::{Appointment, Doctor, Patient};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Long-form date, e.g. "March 10, 2024"
pub const LONG_DATE_FORMAT: &str = "%B %-d, %Y";

/// Clock time, e.g. "02:30 PM"
pub const TIME_FORMAT: &str = "%I:%M %p";

/// Formats a calendar date in long form
pub fn long_date(date: NaiveDate) -> String {
    date.format(LONG_DATE_FORMAT).to_string()
}

/// Formats the time-of-day part of a timestamp
pub fn clock_time(at: DateTime<Utc>) -> String {
    at.format(TIME_FORMAT).to_string()
}

/// Resolution context for text templates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentData {
    pub doctor: DoctorSection,
    pub patient: PatientSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment: Option<AppointmentSection>,
    pub document: DocumentSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DoctorSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinic_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinic_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
}

impl DoctorSection {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "name" => self.name.clone(),
            "email" => self.email.clone(),
            "phone" => self.phone.clone(),
            "specialization" => self.specialization.clone(),
            "clinic_name" => self.clinic_name.clone(),
            "clinic_address" => self.clinic_address.clone(),
            "license_number" => self.license_number.clone(),
            _ => None,
        }
    }
}

impl From<&Doctor> for DoctorSection {
    fn from(doctor: &Doctor) -> Self {
        Self {
            name: doctor.full_name.clone(),
            email: doctor.email.clone(),
            phone: doctor.phone.clone(),
            specialization: doctor.specialization.clone(),
            clinic_name: doctor.clinic_name.clone(),
            clinic_address: doctor.clinic_address.clone(),
            license_number: doctor.license_number.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
}

impl PatientSection {
    fn from_record(patient: &Patient, today: NaiveDate) -> Self {
        Self {
            name: patient.full_name.clone(),
            email: patient.email.clone(),
            phone: patient.phone.clone(),
            date_of_birth: patient.date_of_birth.map(long_date),
            age: patient.age_on(today),
            gender: patient.gender.clone(),
            address: patient.address.clone(),
            blood_type: patient.blood_type.clone(),
            allergies: patient.allergies.clone(),
            emergency_contact: patient.emergency_contact.clone(),
        }
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "name" => self.name.clone(),
            "email" => self.email.clone(),
            "phone" => self.phone.clone(),
            "date_of_birth" => self.date_of_birth.clone(),
            "age" => self.age.map(|a| a.to_string()),
            "gender" => self.gender.clone(),
            "address" => self.address.clone(),
            "blood_type" => self.blood_type.clone(),
            "allergies" => self.allergies.clone(),
            "emergency_contact" => self.emergency_contact.clone(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppointmentSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chief_complaint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AppointmentSection {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "date" => self.date.clone(),
            "time" => self.time.clone(),
            "duration" => self.duration.map(|d| d.to_string()),
            "status" => self.status.clone(),
            "chief_complaint" => self.chief_complaint.clone(),
            "diagnosis" => self.diagnosis.clone(),
            "notes" => self.notes.clone(),
            _ => None,
        }
    }
}

impl From<&Appointment> for AppointmentSection {
    fn from(appointment: &Appointment) -> Self {
        Self {
            date: Some(long_date(appointment.appointment_date.date_naive())),
            time: Some(clock_time(appointment.appointment_date)),
            duration: appointment.duration_minutes,
            status: appointment.status.clone(),
            chief_complaint: appointment.chief_complaint.clone(),
            diagnosis: appointment.diagnosis.clone(),
            notes: appointment.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentSection {
    /// Generation date in long form
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl VariableSource for DocumentData {
    fn lookup(&self, path: &[&str]) -> Option<String> {
        let [section, field] = path else {
            return None;
        };
        match *section {
            "doctor" => self.doctor.field(field),
            "patient" => self.patient.field(field),
            "appointment" => self.appointment.as_ref()?.field(field),
            "document" => match *field {
                "date" => Some(self.document.date.clone()),
                "id" => self.document.id.clone(),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Assembles document data using the current time
///
/// Each call stamps its own generation date.
pub fn assemble(
    doctor: &Doctor,
    patient: &Patient,
    appointment: Option<&Appointment>,
    document_id: Option<&DocumentId>,
) -> DocumentData {
    assemble_at(Utc::now(), doctor, patient, appointment, document_id)
}

/// Assembles document data as of `now`
pub fn assemble_at(
    now: DateTime<Utc>,
    doctor: &Doctor,
    patient: &Patient,
    appointment: Option<&Appointment>,
    document_id: Option<&DocumentId>,
) -> DocumentData {
    let today = now.date_naive();

    DocumentData {
        doctor: DoctorSection::from(doctor),
        patient: PatientSection::from_record(patient, today),
        appointment: appointment.map(AppointmentSection::from),
        document: DocumentSection {
            date: long_date(today),
            id: document_id.map(|id| id.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::variables::{substitute, MISSING_VALUE};
    use crate::domain::ids::{AppointmentId, DoctorId, PatientId};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()
    }

    fn doctor() -> Doctor {
        let mut doctor = Doctor::new(DoctorId::new("d1").unwrap());
        doctor.full_name = Some("Dr. Amal Haddad".to_string());
        doctor.clinic_name = Some("Cedar Clinic".to_string());
        doctor
    }

    fn patient(dob: Option<NaiveDate>) -> Patient {
        let mut patient = Patient::new(PatientId::new("p1").unwrap(), DoctorId::new("d1").unwrap());
        patient.full_name = Some("Jane Doe".to_string());
        patient.date_of_birth = dob;
        patient
    }

    fn appointment() -> Appointment {
        Appointment {
            id: AppointmentId::new("a1").unwrap(),
            doctor_id: DoctorId::new("d1").unwrap(),
            patient_id: PatientId::new("p1").unwrap(),
            appointment_date: Utc.with_ymd_and_hms(2024, 3, 12, 14, 30, 0).unwrap(),
            duration_minutes: Some(30),
            status: None,
            chief_complaint: Some("Headache".to_string()),
            diagnosis: None,
            notes: None,
        }
    }

    #[test]
    fn test_age_before_birthday() {
        let data = assemble_at(
            now(),
            &doctor(),
            &patient(NaiveDate::from_ymd_opt(2000, 3, 11)),
            None,
            None,
        );
        assert_eq!(data.patient.age, Some(23));
    }

    #[test]
    fn test_age_on_birthday() {
        let data = assemble_at(
            now(),
            &doctor(),
            &patient(NaiveDate::from_ymd_opt(2000, 3, 10)),
            None,
            None,
        );
        assert_eq!(data.patient.age, Some(24));
        assert_eq!(data.patient.date_of_birth.as_deref(), Some("March 10, 2000"));
    }

    #[test]
    fn test_missing_date_of_birth_leaves_age_absent() {
        let data = assemble_at(now(), &doctor(), &patient(None), None, None);
        assert_eq!(data.patient.age, None);
        assert_eq!(substitute("{{patient.age}}", &data), MISSING_VALUE);
    }

    #[test]
    fn test_appointment_section_derived_from_timestamp() {
        let appt = appointment();
        let data = assemble_at(now(), &doctor(), &patient(None), Some(&appt), None);
        let section = data.appointment.as_ref().unwrap();

        assert_eq!(section.date.as_deref(), Some("March 12, 2024"));
        assert_eq!(section.time.as_deref(), Some("02:30 PM"));
        assert_eq!(section.duration, Some(30));
        assert_eq!(section.chief_complaint.as_deref(), Some("Headache"));
        assert_eq!(substitute("{{appointment.diagnosis}}", &data), MISSING_VALUE);
    }

    #[test]
    fn test_no_appointment_section_without_record() {
        let data = assemble_at(now(), &doctor(), &patient(None), None, None);
        assert!(data.appointment.is_none());
        assert_eq!(substitute("{{appointment.date}}", &data), MISSING_VALUE);
    }

    #[test]
    fn test_document_section() {
        let id = DocumentId::new("doc-42").unwrap();
        let data = assemble_at(now(), &doctor(), &patient(None), None, Some(&id));

        assert_eq!(data.document.date, "March 10, 2024");
        assert_eq!(
            substitute("{{document.id}} / {{document.date}}", &data),
            "doc-42 / March 10, 2024"
        );
    }

    #[test]
    fn test_document_id_absent_until_known() {
        let data = assemble_at(now(), &doctor(), &patient(None), None, None);
        assert_eq!(substitute("{{document.id}}", &data), MISSING_VALUE);
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let data = assemble_at(now(), &doctor(), &patient(None), None, None);
        let json = serde_json::to_value(&data).unwrap();

        assert!(json["patient"].get("phone").is_none());
        assert!(json.get("appointment").is_none());
        assert_eq!(json["doctor"]["clinic_name"], "Cedar Clinic");
    }

    #[test]
    fn test_typed_lookup_matches_json_lookup() {
        let appt = appointment();
        let data = assemble_at(
            now(),
            &doctor(),
            &patient(NaiveDate::from_ymd_opt(1990, 1, 1)),
            Some(&appt),
            None,
        );
        let json = serde_json::to_value(&data).unwrap();
        let template =
            "{{patient.name}} {{patient.age}} {{doctor.clinic_name}} {{appointment.time}} {{doctor.phone}}";

        assert_eq!(substitute(template, &data), substitute(template, &json));
    }
}
