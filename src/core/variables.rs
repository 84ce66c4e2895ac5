//! `{{path}}` placeholder substitution for text templates
//!
//! Placeholders are matched by the literal text between the braces. Each
//! distinct placeholder text is resolved once and that value is used for
//! every occurrence of the same text. Paths that cannot be resolved are
//! replaced with [`MISSING_VALUE`]; substitution never fails.
//!
//! There is no escape syntax for a literal `{{`.

use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Text substituted for any placeholder whose path cannot be resolved
pub const MISSING_VALUE: &str = "[Not provided]";

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{([^}]+)\}\}").expect("placeholder pattern is valid"))
}

/// A data bag that placeholder paths can be resolved against
pub trait VariableSource {
    /// Walks `path` (already split on `.`) and returns the leaf value's
    /// string form, or `None` if any step is absent or the leaf is null.
    fn lookup(&self, path: &[&str]) -> Option<String>;
}

impl VariableSource for Value {
    fn lookup(&self, path: &[&str]) -> Option<String> {
        let mut current = self;
        for segment in path {
            current = match current {
                Value::Object(map) => map.get(*segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        match current {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            // Null, and whole sections, have no printable value
            Value::Null | Value::Object(_) | Value::Array(_) => None,
        }
    }
}

/// Replaces every `{{path}}` in `content` with its value from `data`
///
/// # Examples
///
/// ```
/// use clinidoc::core::variables::substitute;
/// use serde_json::json;
///
/// let data = json!({"patient": {"name": "Jane Doe"}});
/// assert_eq!(substitute("Dear {{patient.name}}", &data), "Dear Jane Doe");
/// assert_eq!(substitute("{{patient.phone}}", &data), "[Not provided]");
/// ```
pub fn substitute<S: VariableSource + ?Sized>(content: &str, data: &S) -> String {
    let mut resolved: HashMap<String, String> = HashMap::new();

    let output = placeholder_regex().replace_all(content, |caps: &Captures<'_>| {
        let literal = &caps[0];
        resolved
            .entry(literal.to_string())
            .or_insert_with(|| resolve_path(&caps[1], data))
            .clone()
    });

    tracing::trace!(
        placeholders = resolved.len(),
        "Substituted template placeholders"
    );

    output.into_owned()
}

fn resolve_path<S: VariableSource + ?Sized>(raw_path: &str, data: &S) -> String {
    let segments: Vec<&str> = raw_path.trim().split('.').collect();
    data.lookup(&segments)
        .unwrap_or_else(|| MISSING_VALUE.to_string())
}

/// Distinct placeholder paths in `content`, trimmed, in first-seen order
pub fn placeholders(content: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for caps in placeholder_regex().captures_iter(content) {
        let path = caps[1].trim().to_string();
        if !seen.contains(&path) {
            seen.push(path);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "patient": {"name": "Jane Doe", "age": 34, "phone": null},
            "doctor": {"name": "Dr. Smith"},
            "document": {"date": "March 10, 2024"}
        })
    }

    #[test]
    fn test_no_placeholders_is_identity() {
        let content = "Plain text with { single } braces and }} stray closers";
        assert_eq!(substitute(content, &sample()), content);
    }

    #[test]
    fn test_simple_replacement() {
        assert_eq!(substitute("{{patient.name}}", &sample()), "Jane Doe");
    }

    #[test]
    fn test_missing_path_uses_sentinel() {
        assert_eq!(substitute("{{patient.nonexistent}}", &sample()), MISSING_VALUE);
        assert_eq!(substitute("{{appointment.date}}", &sample()), MISSING_VALUE);
    }

    #[test]
    fn test_null_value_uses_sentinel() {
        assert_eq!(substitute("{{patient.phone}}", &sample()), MISSING_VALUE);
    }

    #[test]
    fn test_section_without_leaf_uses_sentinel() {
        assert_eq!(substitute("{{patient}}", &sample()), MISSING_VALUE);
    }

    #[test]
    fn test_numbers_use_plain_string_form() {
        assert_eq!(substitute("Age: {{patient.age}}", &sample()), "Age: 34");
    }

    #[test]
    fn test_whitespace_inside_braces_is_trimmed() {
        assert_eq!(
            substitute("{{ patient.name }} / {{patient.name}}", &sample()),
            "Jane Doe / Jane Doe"
        );
    }

    #[test]
    fn test_repeated_placeholder_replaced_everywhere() {
        let out = substitute(
            "{{doctor.name}} signs for {{doctor.name}} on {{document.date}}",
            &sample(),
        );
        assert_eq!(out, "Dr. Smith signs for Dr. Smith on March 10, 2024");
    }

    #[test]
    fn test_empty_braces_are_left_alone() {
        assert_eq!(substitute("{{}}", &sample()), "{{}}");
    }

    #[test]
    fn test_inserted_values_are_not_rescanned() {
        let data = json!({"patient": {"name": "{{doctor.name}}"}, "doctor": {"name": "X"}});
        assert_eq!(substitute("{{patient.name}}", &data), "{{doctor.name}}");
    }

    #[test]
    fn test_placeholders_are_distinct_and_ordered() {
        let found = placeholders("{{ b.x }} {{a.y}} {{b.x}} {{c}}");
        assert_eq!(found, vec!["b.x", "a.y", "c"]);
    }
}
