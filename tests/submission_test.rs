//! Integration tests for form prefill and submission checks

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clinidoc::core::builder::{
    resolve_all, sanitize_submission, BuilderSchema, FieldValues, PrefillData,
};
use clinidoc::domain::{Doctor, DoctorId, Patient, PatientId};
use serde_json::{json, Value};
use test_case::test_case;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 16, 5, 0).unwrap()
}

fn prefill() -> PrefillData {
    let mut doctor = Doctor::new(DoctorId::new("doc-001").unwrap());
    doctor.full_name = Some("Dr. Amal Haddad".to_string());
    doctor.clinic_name = Some("Cedar Clinic".to_string());

    let mut patient = Patient::new(
        PatientId::new("pat-001").unwrap(),
        DoctorId::new("doc-001").unwrap(),
    );
    patient.full_name = Some("Jane Doe".to_string());
    patient.date_of_birth = NaiveDate::from_ymd_opt(2000, 3, 11);

    PrefillData::from_records(now(), Some(&doctor), Some(&patient), None, Some("Springfield"))
}

fn schema(elements: Value) -> BuilderSchema {
    BuilderSchema::parse(&json!({"version": 2, "elements": elements})).unwrap()
}

fn values(pairs: &[(&str, Value)]) -> FieldValues {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn test_prefill_all_sources() {
    let schema = schema(json!([
        {"id": "1", "type": "text", "label": "Doctor", "name": "doctor",
         "prefill": {"enabled": true, "source": "doctor", "field": "doctor_name"}},
        {"id": "2", "type": "text", "label": "Clinic", "name": "clinic",
         "prefill": {"enabled": true, "source": "doctor", "field": "clinic"}},
        {"id": "3", "type": "number", "label": "Age", "name": "age",
         "prefill": {"enabled": true, "source": "patient", "field": "patient_age"}},
        {"id": "4", "type": "text", "label": "Place", "name": "place",
         "prefill": {"enabled": true, "source": "system", "field": "place"}},
        {"id": "5", "type": "text", "label": "Time", "name": "time",
         "prefill": {"enabled": true, "source": "system", "field": "current_time"}},
        {"id": "6", "type": "text", "label": "Visit", "name": "visit",
         "prefill": {"enabled": true, "source": "appointment", "field": "appointment_date"}},
        {"id": "7", "type": "text", "label": "Off", "name": "off",
         "prefill": {"enabled": false, "source": "patient", "field": "patient_name"}}
    ]));

    let resolved = resolve_all(&schema.elements, &prefill());

    assert_eq!(resolved["doctor"], json!("Dr. Amal Haddad"));
    assert_eq!(resolved["clinic"], json!("Cedar Clinic"));
    assert_eq!(resolved["age"], json!(23));
    assert_eq!(resolved["place"], json!("Springfield"));
    assert_eq!(resolved["time"], json!("16:05"));
    assert!(!resolved.contains_key("visit"));
    assert!(!resolved.contains_key("off"));
}

#[test]
fn test_current_date_wins_over_prefill_source() {
    let schema = schema(json!([
        {"id": "1", "type": "date", "label": "Issued", "name": "issued",
         "properties": {"useCurrentDate": true},
         "prefill": {"enabled": true, "source": "appointment", "field": "appointment_date"}}
    ]));

    let resolved = resolve_all(&schema.elements, &prefill());
    assert_eq!(resolved["issued"], json!("2024-03-10"));
}

#[test]
fn test_locked_field_without_value_drops_client_value() {
    let schema = schema(json!([
        {"id": "1", "type": "text", "label": "Visit", "name": "visit", "required": true,
         "prefill": {"enabled": true, "source": "appointment", "field": "appointment_date", "readonly": true}}
    ]));

    let result = sanitize_submission(
        &schema,
        &values(&[("visit", json!("2024-01-01"))]),
        &prefill(),
    )
    .unwrap();

    assert!(!result.sanitized_data.contains_key("visit"));
    assert_eq!(result.errors, vec!["Visit is required".to_string()]);
}

#[test]
fn test_calculated_fields_are_recomputed() {
    let schema = schema(json!([
        {"id": "1", "type": "number", "label": "A", "name": "a"},
        {"id": "2", "type": "number", "label": "B", "name": "b"},
        {"id": "3", "type": "calculated", "label": "Total", "name": "total",
         "properties": {"calculation": {"kind": "sum", "fields": ["a", "b"]}}},
        {"id": "4", "type": "date", "label": "Born", "name": "born"},
        {"id": "5", "type": "calculated", "label": "Age", "name": "age",
         "properties": {"calculation": {"kind": "age", "fields": ["born"]}}}
    ]));

    let result = sanitize_submission(
        &schema,
        &values(&[
            ("a", json!(50)),
            ("b", json!("25")),
            ("total", json!(1)),
            ("born", json!("2000-03-11")),
            ("age", json!(99)),
        ]),
        &prefill(),
    )
    .unwrap();

    assert!(result.valid);
    assert_eq!(result.sanitized_data["total"], json!(75));
    assert_eq!(result.sanitized_data["age"], json!(23));
}

#[test_case(json!("AB-1234"), &[] ; "matching pattern")]
#[test_case(json!("ab-1234"), &["Use the form AB-1234"] ; "custom pattern message")]
#[test_case(json!("AB-12"), &["Use the form AB-1234", "Reference must be at least 7 characters"] ; "too short")]
#[test_case(json!(""), &["Reference is required"] ; "blank counts as missing")]
fn test_reference_rules(value: Value, expected: &[&str]) {
    let schema = schema(json!([
        {"id": "1", "type": "text", "label": "Reference", "name": "reference", "required": true,
         "validation": {"pattern": "^[A-Z]{2}-\\d{4}$", "message": "Use the form AB-1234", "minLength": 7}}
    ]));

    let result = sanitize_submission(&schema, &values(&[("reference", value)]), &prefill()).unwrap();

    assert_eq!(result.errors, expected);
    assert_eq!(result.valid, expected.is_empty());
}

#[test_case("2024-02-30", false ; "impossible date")]
#[test_case("10/03/2024", false ; "wrong format")]
#[test_case("2024-02-29", true ; "leap day")]
fn test_date_values(value: &str, valid: bool) {
    let schema = schema(json!([
        {"id": "1", "type": "date", "label": "Follow-up", "name": "follow_up"}
    ]));

    let result =
        sanitize_submission(&schema, &values(&[("follow_up", json!(value))]), &prefill()).unwrap();

    assert_eq!(result.valid, valid);
    if !valid {
        assert_eq!(
            result.errors,
            vec!["Follow-up must be a valid date (YYYY-MM-DD)".to_string()]
        );
    }
}

#[test]
fn test_sanitized_data_present_when_invalid() {
    let schema = schema(json!([
        {"id": "1", "type": "text", "label": "Name", "name": "name",
         "prefill": {"enabled": true, "source": "patient", "field": "patient_name", "readonly": true}},
        {"id": "2", "type": "number", "label": "Dose", "name": "dose", "required": true}
    ]));

    let result = sanitize_submission(
        &schema,
        &values(&[("dose", json!("lots")), ("extra", json!(1))]),
        &prefill(),
    )
    .unwrap();

    assert!(!result.valid);
    assert_eq!(result.errors, vec!["Dose must be a number".to_string()]);
    assert_eq!(result.sanitized_data["name"], json!("Jane Doe"));
    assert!(!result.sanitized_data.contains_key("extra"));
}
