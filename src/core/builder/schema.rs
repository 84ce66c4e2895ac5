//! Builder schema model (version 2 templates)
//!
//! A builder schema is an ordered list of form elements. Each element has a
//! type, a field `name` used as the key in submitted data, optional
//! validation rules, a grid position (layout only) and an optional prefill
//! configuration.
//!
//! The wire shape keeps `type` and `properties` side by side:
//!
//! ```json
//! {
//!   "id": "el-1", "type": "number", "label": "Weight (kg)", "name": "weight",
//!   "required": true, "properties": {"min": 0, "max": 400},
//!   "position": {"row": 0, "column": 0, "width": 6}
//! }
//! ```
//!
//! In Rust the type and its properties are one [`ElementKind`] value.

use crate::domain::{DocsError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// The only schema version accepted for builder templates
pub const BUILDER_SCHEMA_VERSION: u32 = 2;

/// Structured form definition of a builder template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuilderSchema {
    pub version: u32,

    pub elements: Vec<BuilderElement>,

    /// Legacy variable list, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

/// A single form element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawElement", into = "RawElement")]
pub struct BuilderElement {
    pub id: String,
    pub label: String,
    /// Key of this element's value in submitted data
    pub name: String,
    pub required: bool,
    pub kind: ElementKind,
    pub validation: Option<ValidationRules>,
    pub position: GridPosition,
    pub prefill: Option<PrefillConfig>,
}

/// Element type together with its type-specific properties
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Text {
        placeholder: Option<String>,
    },
    Number {
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
    },
    Paragraph {
        placeholder: Option<String>,
        rows: Option<u32>,
    },
    Dropdown {
        options: Vec<String>,
    },
    Radio {
        options: Vec<String>,
    },
    Date {
        /// Fill with today's date, taking precedence over any prefill source
        use_current_date: bool,
    },
    Calculated(Calculation),
    Divider,
    Header {
        text: Option<String>,
        level: Option<u8>,
    },
}

/// Element type tag as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Text,
    Number,
    Paragraph,
    Dropdown,
    Radio,
    Date,
    Calculated,
    Divider,
    Header,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::Text => "text",
            ElementType::Number => "number",
            ElementType::Paragraph => "paragraph",
            ElementType::Dropdown => "dropdown",
            ElementType::Radio => "radio",
            ElementType::Date => "date",
            ElementType::Calculated => "calculated",
            ElementType::Divider => "divider",
            ElementType::Header => "header",
        };
        f.write_str(name)
    }
}

impl ElementKind {
    /// The wire type tag of this kind
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Text { .. } => ElementType::Text,
            ElementKind::Number { .. } => ElementType::Number,
            ElementKind::Paragraph { .. } => ElementType::Paragraph,
            ElementKind::Dropdown { .. } => ElementType::Dropdown,
            ElementKind::Radio { .. } => ElementType::Radio,
            ElementKind::Date { .. } => ElementType::Date,
            ElementKind::Calculated(_) => ElementType::Calculated,
            ElementKind::Divider => ElementType::Divider,
            ElementKind::Header { .. } => ElementType::Header,
        }
    }

    /// Whether the element carries a value (dividers and headers do not)
    pub fn holds_value(&self) -> bool {
        !matches!(self, ElementKind::Divider | ElementKind::Header { .. })
    }
}

/// Server-side computation for a calculated element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub kind: CalculationKind,

    /// Names of the input elements, in the order the kind expects
    #[serde(default)]
    pub fields: Vec<String>,

    /// Decimal places to round to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
}

/// Supported calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationKind {
    /// Sum of all input fields
    Sum,
    /// Body-mass index from weight (kg) and height (cm)
    Bmi,
    /// Age in years from a `YYYY-MM-DD` date field
    Age,
}

impl CalculationKind {
    fn expected_inputs(self) -> Option<usize> {
        match self {
            CalculationKind::Sum => None,
            CalculationKind::Bmi => Some(2),
            CalculationKind::Age => Some(1),
        }
    }
}

/// Per-element validation rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Message used instead of the generated one when the pattern fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Grid placement; has no effect on resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    #[serde(default)]
    pub row: u32,
    #[serde(default)]
    pub column: u32,
    #[serde(default = "default_width")]
    pub width: u8,
}

impl Default for GridPosition {
    fn default() -> Self {
        Self {
            row: 0,
            column: 0,
            width: default_width(),
        }
    }
}

fn default_width() -> u8 {
    12
}

/// Where a prefilled value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefillSource {
    Patient,
    Doctor,
    Appointment,
    System,
}

impl PrefillSource {
    /// Field keys this source can supply
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            PrefillSource::Patient => &["name", "phone", "email", "id", "age", "gender"],
            PrefillSource::Doctor => &["name", "clinic", "id"],
            PrefillSource::Appointment => &["date", "time", "id"],
            PrefillSource::System => &["current_date", "current_time", "place"],
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            PrefillSource::Patient => "patient_",
            PrefillSource::Doctor => "doctor_",
            PrefillSource::Appointment => "appointment_",
            PrefillSource::System => "system_",
        }
    }

    /// Strips this source's prefix from a configured field
    ///
    /// `patient_name` under `patient` becomes `name`; a field without the
    /// prefix is returned unchanged.
    pub fn field_key<'a>(self, field: &'a str) -> &'a str {
        field.strip_prefix(self.prefix()).unwrap_or(field)
    }

    /// Whether `field` names something this source can supply
    pub fn supports(self, field: &str) -> bool {
        self.fields().contains(&self.field_key(field))
    }
}

impl fmt::Display for PrefillSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrefillSource::Patient => "patient",
            PrefillSource::Doctor => "doctor",
            PrefillSource::Appointment => "appointment",
            PrefillSource::System => "system",
        };
        f.write_str(name)
    }
}

/// Prefill configuration of an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefillConfig {
    #[serde(default)]
    pub enabled: bool,
    pub source: PrefillSource,
    pub field: String,
    /// Locked fields always take the resolved value on submission
    #[serde(default)]
    pub readonly: bool,
}

impl BuilderElement {
    /// Whether the element declares an active prefill
    pub fn prefill_enabled(&self) -> bool {
        self.prefill.as_ref().is_some_and(|p| p.enabled)
    }

    /// Whether the element is a locked (read-only prefilled) field
    pub fn is_locked(&self) -> bool {
        self.prefill.as_ref().is_some_and(|p| p.enabled && p.readonly)
    }
}

impl BuilderSchema {
    /// Creates a version 2 schema from elements
    pub fn new(elements: Vec<BuilderElement>) -> Self {
        Self {
            version: BUILDER_SCHEMA_VERSION,
            elements,
            variables: None,
        }
    }

    /// Parses and validates a schema from JSON
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::InvalidSchema`] if the JSON does not have the
    /// schema shape or [`BuilderSchema::validate`] fails.
    pub fn parse(value: &serde_json::Value) -> Result<Self> {
        let schema: BuilderSchema = serde_json::from_value(value.clone())
            .map_err(|e| DocsError::InvalidSchema(e.to_string()))?;
        schema.validate()?;
        Ok(schema)
    }

    /// Looks up an element by field name
    pub fn element(&self, name: &str) -> Option<&BuilderElement> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Elements that carry a value, in schema order
    pub fn input_elements(&self) -> impl Iterator<Item = &BuilderElement> {
        self.elements.iter().filter(|e| e.kind.holds_value())
    }

    /// Calculated elements ordered so each one follows the calculated
    /// fields it reads
    ///
    /// Elements on a dependency cycle are left out; [`BuilderSchema::validate`]
    /// rejects such schemas.
    pub fn calculation_order(&self) -> Vec<&BuilderElement> {
        let calculated: Vec<(&BuilderElement, &Calculation)> = self
            .elements
            .iter()
            .filter_map(|e| match &e.kind {
                ElementKind::Calculated(calc) => Some((e, calc)),
                _ => None,
            })
            .collect();
        let calculated_names: HashSet<&str> =
            calculated.iter().map(|(e, _)| e.name.as_str()).collect();

        let mut ordered = Vec::with_capacity(calculated.len());
        let mut placed = HashSet::new();
        loop {
            let before = ordered.len();
            for (element, calc) in &calculated {
                if placed.contains(element.name.as_str()) {
                    continue;
                }
                let ready = calc.fields.iter().all(|input| {
                    !calculated_names.contains(input.as_str()) || placed.contains(input.as_str())
                });
                if ready {
                    placed.insert(element.name.as_str());
                    ordered.push(*element);
                }
            }
            if ordered.len() == before {
                break;
            }
        }
        ordered
    }

    /// Checks the schema's structural rules
    ///
    /// All problems are collected into a single error. Prefill fields outside
    /// the known vocabulary are only warned about: they resolve to no value.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::InvalidSchema`] listing every violation.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.version != BUILDER_SCHEMA_VERSION {
            problems.push(format!(
                "unsupported schema version {} (expected {})",
                self.version, BUILDER_SCHEMA_VERSION
            ));
        }

        let mut names = HashSet::new();
        for element in &self.elements {
            if element.kind.holds_value() && element.name.trim().is_empty() {
                problems.push(format!("element '{}' has no field name", element.id));
            }
            if !element.name.is_empty() && !names.insert(element.name.as_str()) {
                problems.push(format!("duplicate field name '{}'", element.name));
            }
            if !(1..=12).contains(&element.position.width) {
                problems.push(format!(
                    "element '{}' has width {} (must be 1-12)",
                    element.id, element.position.width
                ));
            }

            match &element.kind {
                ElementKind::Dropdown { options } | ElementKind::Radio { options }
                    if options.is_empty() =>
                {
                    problems.push(format!("element '{}' has no options", element.id));
                }
                ElementKind::Number {
                    min: Some(min),
                    max: Some(max),
                    ..
                } if min > max => {
                    problems.push(format!("element '{}' has min greater than max", element.id));
                }
                ElementKind::Calculated(calc) => {
                    if let Some(expected) = calc.kind.expected_inputs() {
                        if calc.fields.len() != expected {
                            problems.push(format!(
                                "element '{}' needs {} input field(s) for {:?}",
                                element.id, expected, calc.kind
                            ));
                        }
                    }
                }
                _ => {}
            }

            if let Some(pattern) = element.validation.as_ref().and_then(|v| v.pattern.as_ref()) {
                if let Err(e) = Regex::new(pattern) {
                    problems.push(format!(
                        "element '{}' has an invalid pattern: {}",
                        element.id, e
                    ));
                }
            }

            if let Some(prefill) = &element.prefill {
                if prefill.enabled && !prefill.source.supports(&prefill.field) {
                    tracing::warn!(
                        element_id = %element.id,
                        source = %prefill.source,
                        field = %prefill.field,
                        "Prefill field is not supplied by its source and will stay empty"
                    );
                }
            }
        }

        for element in &self.elements {
            if let ElementKind::Calculated(calc) = &element.kind {
                for input in &calc.fields {
                    if !names.contains(input.as_str()) {
                        problems.push(format!(
                            "element '{}' references unknown field '{}'",
                            element.id, input
                        ));
                    }
                }
            }
        }

        let ordered: HashSet<&str> = self
            .calculation_order()
            .into_iter()
            .map(|e| e.name.as_str())
            .collect();
        let cyclic: Vec<&str> = self
            .elements
            .iter()
            .filter(|e| matches!(e.kind, ElementKind::Calculated(_)))
            .filter(|e| !ordered.contains(e.name.as_str()))
            .map(|e| e.id.as_str())
            .collect();
        if !cyclic.is_empty() {
            problems.push(format!(
                "calculated elements depend on each other in a cycle: {}",
                cyclic.join(", ")
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DocsError::InvalidSchema(problems.join("; ")))
        }
    }
}

// Wire representation: `type` + `properties` instead of a Rust enum.

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawElement {
    id: String,
    #[serde(rename = "type")]
    element_type: ElementType,
    #[serde(default)]
    label: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    properties: RawProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    validation: Option<ValidationRules>,
    #[serde(default)]
    position: GridPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefill: Option<PrefillConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    use_current_date: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    calculation: Option<Calculation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    level: Option<u8>,
}

impl TryFrom<RawElement> for BuilderElement {
    type Error = String;

    fn try_from(raw: RawElement) -> std::result::Result<Self, Self::Error> {
        let p = raw.properties;
        let kind = match raw.element_type {
            ElementType::Text => ElementKind::Text {
                placeholder: p.placeholder,
            },
            ElementType::Number => ElementKind::Number {
                min: p.min,
                max: p.max,
                step: p.step,
            },
            ElementType::Paragraph => ElementKind::Paragraph {
                placeholder: p.placeholder,
                rows: p.rows,
            },
            ElementType::Dropdown => ElementKind::Dropdown { options: p.options },
            ElementType::Radio => ElementKind::Radio { options: p.options },
            ElementType::Date => ElementKind::Date {
                use_current_date: p.use_current_date,
            },
            ElementType::Calculated => ElementKind::Calculated(p.calculation.ok_or_else(|| {
                format!("calculated element '{}' has no calculation", raw.id)
            })?),
            ElementType::Divider => ElementKind::Divider,
            ElementType::Header => ElementKind::Header {
                text: p.text,
                level: p.level,
            },
        };

        Ok(Self {
            id: raw.id,
            label: raw.label,
            name: raw.name,
            required: raw.required,
            kind,
            validation: raw.validation,
            position: raw.position,
            prefill: raw.prefill,
        })
    }
}

impl From<BuilderElement> for RawElement {
    fn from(element: BuilderElement) -> Self {
        let element_type = element.kind.element_type();
        let mut p = RawProperties::default();
        match element.kind {
            ElementKind::Text { placeholder } => p.placeholder = placeholder,
            ElementKind::Number { min, max, step } => {
                p.min = min;
                p.max = max;
                p.step = step;
            }
            ElementKind::Paragraph { placeholder, rows } => {
                p.placeholder = placeholder;
                p.rows = rows;
            }
            ElementKind::Dropdown { options } | ElementKind::Radio { options } => {
                p.options = options;
            }
            ElementKind::Date { use_current_date } => p.use_current_date = use_current_date,
            ElementKind::Calculated(calc) => p.calculation = Some(calc),
            ElementKind::Divider => {}
            ElementKind::Header { text, level } => {
                p.text = text;
                p.level = level;
            }
        }

        Self {
            id: element.id,
            element_type,
            label: element.label,
            name: element.name,
            required: element.required,
            properties: p,
            validation: element.validation,
            position: element.position,
            prefill: element.prefill,
        }
    }
}
