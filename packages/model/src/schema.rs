//! Feature schema and the fixed categorical vocabularies

use serde::{Deserialize, Serialize};

/// Type flags accepted by the multi-select `types` field
pub const TYPE_FEATURES: [&str; 11] = [
    "Dark", "Dragon", "Electric", "Fighting", "Fire", "Flying", "Grass", "Normal", "Poison",
    "Rock", "Water",
];

/// Colors accepted by the single-select `color` field
pub const COLOR_FEATURES: [&str; 10] = [
    "Black", "Blue", "Brown", "Green", "Grey", "Pink", "Purple", "Red", "White", "Yellow",
];

/// Ordered input dimensions of a loaded model.
///
/// Taken verbatim from the artifact's declared feature names. The vector handed
/// to the model must have exactly this width and column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column index of `name`, if the model declares it
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
