//! Text template content (version "1.0")
//!
//! A text template is a body with literal `{{path}}` placeholders plus the
//! list of paths its author expects. [`is_valid`] is the structural gate run
//! before content is stored or rendered; it deliberately does not check that
//! the placeholders match the declared variables.

use super::variables::placeholders;
use crate::domain::{DocsError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The only version string accepted for text templates
pub const TEXT_TEMPLATE_VERSION: &str = "1.0";

/// Structured content of a text template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateContent {
    /// Always "1.0"
    pub version: String,

    /// Dotted paths the author expects to be available
    pub variables: Vec<String>,

    /// Body text with `{{path}}` placeholders
    pub content: String,

    /// Always empty for text templates; kept for storage compatibility
    #[serde(default)]
    pub elements: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_settings: Option<Value>,
}

/// Structural check for text template content
///
/// Valid iff `content` is an object with `version == "1.0"`, array
/// `variables`, array `elements` and a string `content`.
///
/// # Examples
///
/// ```
/// use clinidoc::core::content::is_valid;
/// use serde_json::json;
///
/// assert!(is_valid(&json!({
///     "version": "1.0", "variables": [], "elements": [], "content": "Hello"
/// })));
/// assert!(!is_valid(&json!({"version": "1.0", "variables": [], "content": "Hello"})));
/// ```
pub fn is_valid(content: &Value) -> bool {
    let Value::Object(map) = content else {
        return false;
    };

    map.get("version").and_then(Value::as_str) == Some(TEXT_TEMPLATE_VERSION)
        && map.get("variables").is_some_and(Value::is_array)
        && map.get("elements").is_some_and(Value::is_array)
        && map.get("content").is_some_and(Value::is_string)
}

impl TemplateContent {
    /// Builds content from template text, declaring every placeholder found
    ///
    /// # Examples
    ///
    /// ```
    /// use clinidoc::core::content::TemplateContent;
    ///
    /// let content = TemplateContent::from_text("Dear {{patient.name}}, see {{doctor.name}}.");
    /// assert_eq!(content.variables, vec!["patient.name", "doctor.name"]);
    /// ```
    pub fn from_text(text: impl Into<String>) -> Self {
        let content = text.into();
        Self {
            version: TEXT_TEMPLATE_VERSION.to_string(),
            variables: placeholders(&content),
            content,
            elements: Vec::new(),
            styles: None,
            page_settings: None,
        }
    }

    /// Validates and converts raw JSON into typed content
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::InvalidTemplate`] if the structural check fails
    /// or `variables` holds non-string entries.
    pub fn parse(value: &Value) -> Result<Self> {
        if !is_valid(value) {
            return Err(DocsError::InvalidTemplate(
                "template content must have version \"1.0\", variables, elements and content"
                    .to_string(),
            ));
        }

        let content: TemplateContent = serde_json::from_value(value.clone())
            .map_err(|e| DocsError::InvalidTemplate(e.to_string()))?;

        let undeclared = content.undeclared_placeholders();
        if !undeclared.is_empty() {
            tracing::warn!(
                undeclared = ?undeclared,
                "Template uses placeholders that are not declared as variables"
            );
        }

        Ok(content)
    }

    /// Placeholder paths used in the body but missing from `variables`
    pub fn undeclared_placeholders(&self) -> Vec<String> {
        placeholders(&self.content)
            .into_iter()
            .filter(|path| !self.variables.contains(path))
            .collect()
    }

    /// Serializes back into the stored JSON shape
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "version": "1.0",
            "variables": ["patient.name"],
            "elements": [],
            "content": "Dear {{patient.name}}"
        })
    }

    #[test]
    fn test_valid_content() {
        assert!(is_valid(&valid()));
    }

    #[test]
    fn test_missing_elements_is_invalid() {
        let mut value = valid();
        value.as_object_mut().unwrap().remove("elements");
        assert!(!is_valid(&value));
    }

    #[test]
    fn test_wrong_version_is_invalid() {
        let mut value = valid();
        value["version"] = json!(1.0);
        assert!(!is_valid(&value));
        value["version"] = json!("2.0");
        assert!(!is_valid(&value));
    }

    #[test]
    fn test_non_object_is_invalid() {
        assert!(!is_valid(&Value::Null));
        assert!(!is_valid(&json!("1.0")));
        assert!(!is_valid(&json!([valid()])));
    }

    #[test]
    fn test_content_must_be_string() {
        let mut value = valid();
        value["content"] = json!(["Dear"]);
        assert!(!is_valid(&value));
    }

    #[test]
    fn test_validation_is_repeatable() {
        let value = valid();
        assert_eq!(is_valid(&value), is_valid(&value));
    }

    #[test]
    fn test_undeclared_placeholders_do_not_fail_validation() {
        let mut value = valid();
        value["content"] = json!("{{patient.name}} {{doctor.name}}");
        let content = TemplateContent::parse(&value).unwrap();
        assert_eq!(content.undeclared_placeholders(), vec!["doctor.name"]);
    }

    #[test]
    fn test_parse_rejects_invalid() {
        let result = TemplateContent::parse(&json!({"version": "1.0"}));
        assert!(matches!(result, Err(DocsError::InvalidTemplate(_))));
    }

    #[test]
    fn test_parse_rejects_non_string_variables() {
        let mut value = valid();
        value["variables"] = json!([1, 2]);
        let result = TemplateContent::parse(&value);
        assert!(matches!(result, Err(DocsError::InvalidTemplate(_))));
    }

    #[test]
    fn test_from_text_round_trips_through_validator() {
        let content = TemplateContent::from_text("{{patient.name}} on {{document.date}}");
        let value = content.to_value().unwrap();
        assert!(is_valid(&value));
        assert_eq!(value["elements"], json!([]));
        assert!(value.get("pageSettings").is_none());
    }
}
