//! Feature Encoder
//!
//! Maps a submitted form onto the model's feature schema. Encoding never fails:
//! blank, missing or malformed fields resolve to a per-field default so that a
//! partial submission still yields a complete vector of the schema's width.

use std::collections::HashMap;

use serde::Serialize;

use crate::schema::{COLOR_FEATURES, FeatureSchema, TYPE_FEATURES};

/// Value a checkbox submits when ticked
pub const CHECKED: &str = "on";

/// Multi-select field carrying the selected type flags
pub const TYPES_FIELD: &str = "types";

/// Single-select field carrying the color
pub const COLOR_FIELD: &str = "color";

/// How a scalar form field resolves to a float
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRule {
    /// Plain float with a fallback
    Number { default: f64 },
    /// Float truncated toward zero
    Integer { default: f64 },
    /// `1.0` when the checkbox sentinel was submitted, otherwise `0.0`
    Flag,
    /// Float clamped into `[0.0, 1.0]` after applying the fallback
    Proportion { default: f64 },
}

impl FieldRule {
    pub fn resolve(self, value: Option<&str>) -> f64 {
        match self {
            FieldRule::Number { default } => parse_number(value).unwrap_or(default),
            FieldRule::Integer { default } => parse_number(value).map(f64::trunc).unwrap_or(default),
            FieldRule::Flag => {
                if value == Some(CHECKED) {
                    1.0
                } else {
                    0.0
                }
            }
            FieldRule::Proportion { default } => {
                parse_number(value).unwrap_or(default).clamp(0.0, 1.0)
            }
        }
    }
}

/// Scalar fields and their resolution rules
pub const FIELD_RULES: [(&str, FieldRule); 15] = [
    ("Total", FieldRule::Number { default: 0.0 }),
    ("HP", FieldRule::Number { default: 0.0 }),
    ("Attack", FieldRule::Number { default: 0.0 }),
    ("Defense", FieldRule::Number { default: 0.0 }),
    ("Sp_Atk", FieldRule::Number { default: 0.0 }),
    ("Sp_Def", FieldRule::Number { default: 0.0 }),
    ("Speed", FieldRule::Number { default: 0.0 }),
    ("Generation", FieldRule::Integer { default: 1.0 }),
    ("hasGender", FieldRule::Flag),
    ("hasMegaEvolution", FieldRule::Flag),
    ("Pr_Male", FieldRule::Proportion { default: 0.5 }),
    ("Height_m", FieldRule::Number { default: 1.0 }),
    ("Weight_kg", FieldRule::Number { default: 10.0 }),
    ("Catch_Rate", FieldRule::Number { default: 45.0 }),
    // frequency encoded during training, submitted as a number
    ("Body_Style_new", FieldRule::Number { default: 1.0 }),
];

/// Trimmed float parse; blanks and non-finite values count as missing
fn parse_number(value: Option<&str>) -> Option<f64> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Raw form submission: every field name maps to all values submitted for it.
#[derive(Debug, Clone, Default)]
pub struct RawInput {
    fields: HashMap<String, Vec<String>>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// First value submitted for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value submitted for `name`, in submission order
    pub fn get_all(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl<K, V> FromIterator<(K, V)> for RawInput
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut input = RawInput::new();
        for (name, value) in iter {
            input.push(name, value);
        }
        input
    }
}

/// One encoded request: the dense vector plus the schema it was built against.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFeatures<'a> {
    schema: &'a FeatureSchema,
    vector: Vec<f64>,
}

/// A resolved feature value, echoed back for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedValue<'a> {
    pub name: &'a str,
    pub value: f64,
}

impl<'a> EncodedFeatures<'a> {
    pub fn vector(&self) -> &[f64] {
        &self.vector
    }

    /// Resolved value of a schema feature
    pub fn get(&self, name: &str) -> Option<f64> {
        self.schema.position(name).map(|idx| self.vector[idx])
    }

    /// One entry per schema feature, in schema order
    pub fn named_values(&self) -> Vec<NamedValue<'a>> {
        self.schema
            .iter()
            .zip(self.vector.iter())
            .map(|(name, value)| NamedValue {
                name,
                value: *value,
            })
            .collect()
    }
}

/// Encode a submission against `schema`.
///
/// Every schema entry starts at `0.0`; rules only write to features the schema
/// declares, and submitted fields the schema does not know are ignored.
pub fn encode<'a>(raw: &RawInput, schema: &'a FeatureSchema) -> EncodedFeatures<'a> {
    let mut vector = vec![0.0; schema.len()];
    let mut set = |name: &str, value: f64| {
        if let Some(idx) = schema.position(name) {
            vector[idx] = value;
        }
    };

    for (name, rule) in FIELD_RULES {
        set(name, rule.resolve(raw.get(name)));
    }

    let selected_types = raw.get_all(TYPES_FIELD);
    for name in TYPE_FEATURES {
        let selected = selected_types.iter().any(|t| t == name);
        set(name, if selected { 1.0 } else { 0.0 });
    }

    if let Some(color) = raw.get(COLOR_FIELD) {
        if COLOR_FEATURES.contains(&color) {
            set(color, 1.0);
        }
    }

    EncodedFeatures { schema, vector }
}
