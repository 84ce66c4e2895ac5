//! Submission sanitizing for builder forms
//!
//! The client renders prefilled values but can tamper with anything in the
//! page, so the submitted map is rebuilt here against the same resolution
//! rules:
//!
//! - locked fields (prefill enabled + readonly) always take the value
//!   resolved from the supplied [`PrefillData`], whatever the client sent;
//! - fields the client left empty fall back to the resolved value, so
//!   `useCurrentDate` dates are filled in;
//! - calculated fields are recomputed from their inputs;
//! - keys that do not name an input element are dropped.
//!
//! Every rule violation is collected; the caller gets the full list together
//! with the sanitized data so the form can be re-rendered.

use super::prefill::{resolve_all, FieldValues, PrefillData, FORM_DATE_FORMAT};
use super::schema::{
    BuilderElement, BuilderSchema, Calculation, CalculationKind, ElementKind, ValidationRules,
};
use crate::domain::records::calendar_age;
use crate::domain::Result;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Outcome of checking a submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub valid: bool,
    pub errors: Vec<String>,
    /// Always present, even when `valid` is false
    pub sanitized_data: FieldValues,
}

/// Rebuilds and validates submitted form data
///
/// `prefill` must come from live records, never from data the client sent.
///
/// # Errors
///
/// Returns [`DocsError::InvalidSchema`](crate::domain::DocsError::InvalidSchema)
/// if the schema itself is malformed. Rule violations in the submitted data
/// are reported through [`SubmissionResult::errors`] instead.
pub fn sanitize_submission(
    schema: &BuilderSchema,
    submitted: &FieldValues,
    prefill: &PrefillData,
) -> Result<SubmissionResult> {
    schema.validate()?;

    let authoritative = resolve_all(&schema.elements, prefill);
    let mut sanitized = FieldValues::new();
    let mut resolved_fields = HashSet::new();

    for element in schema.input_elements() {
        if element.is_locked() {
            if let Some(value) = authoritative.get(&element.name) {
                sanitized.insert(element.name.clone(), value.clone());
            }
            if submitted.contains_key(&element.name)
                && submitted.get(&element.name) != authoritative.get(&element.name)
            {
                tracing::debug!(field = %element.name, "Replaced client value of locked field");
            }
            continue;
        }

        if matches!(element.kind, ElementKind::Calculated(_)) {
            continue;
        }

        let client_value = submitted.get(&element.name).filter(|v| !is_empty(v));
        match (client_value, authoritative.get(&element.name)) {
            (Some(value), _) => {
                sanitized.insert(element.name.clone(), value.clone());
            }
            (None, Some(resolved)) => {
                sanitized.insert(element.name.clone(), resolved.clone());
                resolved_fields.insert(element.name.as_str());
            }
            (None, None) => {
                if let Some(value) = submitted.get(&element.name) {
                    sanitized.insert(element.name.clone(), value.clone());
                }
            }
        }
    }

    for element in schema.calculation_order() {
        if let ElementKind::Calculated(calc) = &element.kind {
            if let Some(value) = calculate(calc, &sanitized, prefill.today) {
                sanitized.insert(element.name.clone(), value);
            }
        }
    }

    let dropped = submitted
        .keys()
        .filter(|key| schema.element(key).map_or(true, |e| !e.kind.holds_value()))
        .count();
    if dropped > 0 {
        tracing::debug!(dropped, "Dropped submitted keys that match no input element");
    }

    let mut errors = Vec::new();
    for element in schema.input_elements() {
        let overridden = (element.is_locked() && authoritative.contains_key(&element.name))
            || resolved_fields.contains(element.name.as_str());
        check_element(element, sanitized.get(&element.name), overridden, &mut errors);
    }

    Ok(SubmissionResult {
        valid: errors.is_empty(),
        errors,
        sanitized_data: sanitized,
    })
}

fn check_element(
    element: &BuilderElement,
    value: Option<&Value>,
    overridden: bool,
    errors: &mut Vec<String>,
) {
    let label = display_label(element);

    let Some(value) = value.filter(|v| !is_empty(v)) else {
        if element.required && !overridden {
            errors.push(format!("{label} is required"));
        }
        return;
    };

    let rules = element.validation.as_ref();

    match &element.kind {
        ElementKind::Number { min, max, .. } => match as_number(value) {
            Some(n) => {
                let min = tighter(*min, rules.and_then(|r| r.min), f64::max);
                let max = tighter(*max, rules.and_then(|r| r.max), f64::min);
                check_range(label, n, min, max, errors);
            }
            None => errors.push(format!("{label} must be a number")),
        },
        ElementKind::Dropdown { options } | ElementKind::Radio { options } => {
            let chosen = as_text(value);
            if !options.iter().any(|o| *o == chosen) {
                errors.push(format!("{label} must be one of: {}", options.join(", ")));
            }
        }
        ElementKind::Date { .. } => {
            if NaiveDate::parse_from_str(&as_text(value), FORM_DATE_FORMAT).is_err() {
                errors.push(format!("{label} must be a valid date (YYYY-MM-DD)"));
            }
        }
        ElementKind::Text { .. } | ElementKind::Paragraph { .. } | ElementKind::Calculated(_) => {}
        ElementKind::Divider | ElementKind::Header { .. } => return,
    }

    if let Some(rules) = rules {
        let numeric = matches!(element.kind, ElementKind::Number { .. });
        check_rules(label, rules, value, !numeric, errors);
    }
}

fn check_rules(
    label: &str,
    rules: &ValidationRules,
    value: &Value,
    check_bounds: bool,
    errors: &mut Vec<String>,
) {
    let text = as_text(value);

    if let Some(pattern) = &rules.pattern {
        // Schema validation rejects patterns that do not compile
        if let Ok(re) = Regex::new(pattern) {
            if !re.is_match(&text) {
                errors.push(
                    rules
                        .message
                        .clone()
                        .unwrap_or_else(|| format!("{label} has an invalid format")),
                );
            }
        }
    }

    let length = text.chars().count();
    if let Some(min_length) = rules.min_length {
        if length < min_length {
            errors.push(format!("{label} must be at least {min_length} characters"));
        }
    }
    if let Some(max_length) = rules.max_length {
        if length > max_length {
            errors.push(format!("{label} must be at most {max_length} characters"));
        }
    }

    if check_bounds && (rules.min.is_some() || rules.max.is_some()) {
        match as_number(value) {
            Some(n) => check_range(label, n, rules.min, rules.max, errors),
            None => errors.push(format!("{label} must be a number")),
        }
    }
}

/// Combines a `properties` bound with a `validation` bound
fn tighter(a: Option<f64>, b: Option<f64>, pick: fn(f64, f64) -> f64) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(pick(a, b)),
        (a, b) => a.or(b),
    }
}

fn check_range(label: &str, n: f64, min: Option<f64>, max: Option<f64>, errors: &mut Vec<String>) {
    if let Some(min) = min {
        if n < min {
            errors.push(format!("{label} must be at least {min}"));
        }
    }
    if let Some(max) = max {
        if n > max {
            errors.push(format!("{label} must be at most {max}"));
        }
    }
}

fn calculate(calc: &Calculation, values: &FieldValues, today: NaiveDate) -> Option<Value> {
    let number = |name: &String| values.get(name).and_then(as_number);

    let result = match calc.kind {
        CalculationKind::Sum => calc
            .fields
            .iter()
            .map(number)
            .sum::<Option<f64>>()
            .map(|total| round(total, calc.decimals))?,
        CalculationKind::Bmi => {
            let weight_kg = number(calc.fields.first()?)?;
            let height_m = number(calc.fields.get(1)?)? / 100.0;
            if height_m <= 0.0 {
                return None;
            }
            round(weight_kg / (height_m * height_m), calc.decimals.or(Some(1)))
        }
        CalculationKind::Age => {
            let raw = as_text(values.get(calc.fields.first()?)?);
            let birth = NaiveDate::parse_from_str(&raw, FORM_DATE_FORMAT).ok()?;
            f64::from(calendar_age(birth, today))
        }
    };

    number_value(result)
}

fn round(value: f64, decimals: Option<u32>) -> f64 {
    match decimals {
        Some(d) => {
            let factor = 10f64.powi(d as i32);
            (value * factor).round() / factor
        }
        None => value,
    }
}

fn number_value(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        return Some(Value::from(n as i64));
    }
    serde_json::Number::from_f64(n).map(Value::Number)
}

fn display_label(element: &BuilderElement) -> &str {
    if element.label.trim().is_empty() {
        &element.name
    } else {
        &element.label
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
