//! Inference Adapter
//!
//! Wraps a loaded [`Classifier`] behind the single-row contract used by the web
//! surface: a boolean label, an optional positive-class probability and a static
//! feature importance ranking.

use std::fmt;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::schema::FeatureSchema;

/// Number of entries shown on the importance dashboard
pub const TOP_IMPORTANCES: usize = 12;

/// Used when the positive class cannot be found in a probability table's class list.
/// Matches the usual `[false, true]` ordering; kept as-is for ambiguous models.
pub const FALLBACK_POSITIVE_INDEX: usize = 1;

/// A class label as stored in a model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl ClassLabel {
    /// Boolean reading of the label
    pub fn is_truthy(&self) -> bool {
        match self {
            ClassLabel::Bool(value) => *value,
            ClassLabel::Int(value) => *value != 0,
            ClassLabel::Text(text) => {
                if text.eq_ignore_ascii_case("true") {
                    true
                } else if text.eq_ignore_ascii_case("false") {
                    false
                } else {
                    !text.is_empty()
                }
            }
        }
    }

    /// Whether this label is the affirmative class (`true`, or `1`)
    pub fn is_positive(&self) -> bool {
        matches!(self, ClassLabel::Bool(true) | ClassLabel::Int(1))
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassLabel::Bool(value) => write!(f, "{value}"),
            ClassLabel::Int(value) => write!(f, "{value}"),
            ClassLabel::Text(text) => write!(f, "{text}"),
        }
    }
}

/// Optional capabilities of a model, described once at load time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Capabilities {
    pub predict_proba: bool,
    /// One weight per declared feature, when the model exposes them
    pub feature_importances: Option<Vec<f64>>,
}

/// Per-row class probabilities, with the class order of the columns
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityTable {
    pub classes: Vec<ClassLabel>,
    pub probabilities: Array2<f64>,
}

/// A pre-trained classifier consumed as a capability
pub trait Classifier: Send + Sync {
    /// Human readable model kind, used in logs and errors
    fn kind(&self) -> String;

    /// Declared input names, in column order
    fn feature_names(&self) -> &[String];

    fn capabilities(&self) -> Capabilities;

    /// One label per row of `rows`
    fn predict(&self, rows: ArrayView2<'_, f64>) -> ModelResult<Vec<ClassLabel>>;

    /// Class probabilities per row of `rows`
    fn predict_proba(&self, _rows: ArrayView2<'_, f64>) -> ModelResult<ProbabilityTable> {
        Err(ModelError::Unsupported {
            model: self.kind(),
            capability: "probability estimates",
        })
    }
}

/// Outcome of a single-row inference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: bool,
    /// Positive-class probability; `None` when the model cannot estimate it
    pub probability: Option<f64>,
}

/// A (feature, weight) pair of the importance ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub name: String,
    pub weight: f64,
}

/// Process-wide, read-only handle around the loaded classifier.
pub struct InferenceAdapter {
    classifier: Box<dyn Classifier>,
    schema: FeatureSchema,
    capabilities: Capabilities,
}

impl fmt::Debug for InferenceAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceAdapter")
            .field("model", &self.classifier.kind())
            .field("features", &self.schema.len())
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

impl InferenceAdapter {
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        let schema = FeatureSchema::new(classifier.feature_names().iter().cloned());
        let capabilities = classifier.capabilities();
        tracing::debug!(
            model = %classifier.kind(),
            features = schema.len(),
            predict_proba = capabilities.predict_proba,
            importances = capabilities.feature_importances.is_some(),
            "Inference adapter ready"
        );
        Self {
            classifier,
            schema,
            capabilities,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn model_kind(&self) -> String {
        self.classifier.kind()
    }

    /// Run the model on a single feature vector.
    pub fn predict(&self, vector: &[f64]) -> ModelResult<Prediction> {
        if vector.len() != self.schema.len() {
            return Err(ModelError::SchemaMismatch {
                expected: self.schema.len(),
                actual: vector.len(),
            });
        }
        let row = ArrayView2::from_shape((1, vector.len()), vector)?;

        let label = self
            .classifier
            .predict(row)?
            .first()
            .map(ClassLabel::is_truthy)
            .ok_or(ModelError::EmptyPrediction)?;

        let probability = if self.capabilities.predict_proba {
            let table = self.classifier.predict_proba(row)?;
            Some(positive_probability(&table)?)
        } else {
            None
        };

        Ok(Prediction { label, probability })
    }

    /// Features ranked by model importance, heaviest first, at most [`TOP_IMPORTANCES`].
    ///
    /// Empty when the model exposes no importances or their count differs from the schema.
    pub fn importances(&self) -> Vec<FeatureImportance> {
        match &self.capabilities.feature_importances {
            Some(weights) if weights.len() == self.schema.len() => {
                rank_importances(&self.schema, weights)
            }
            _ => Vec::new(),
        }
    }
}

/// Probability of the positive class in the first row of `table`
pub fn positive_probability(table: &ProbabilityTable) -> ModelResult<f64> {
    let index = table
        .classes
        .iter()
        .position(ClassLabel::is_positive)
        .unwrap_or(FALLBACK_POSITIVE_INDEX);
    let columns = table.probabilities.ncols();
    if table.probabilities.nrows() == 0 {
        return Err(ModelError::EmptyPrediction);
    }
    if index >= columns {
        return Err(ModelError::ProbabilityColumn { index, columns });
    }
    Ok(table.probabilities[[0, index]])
}

/// Pair weights with schema names, sort descending (stable), keep the top entries
pub fn rank_importances(schema: &FeatureSchema, weights: &[f64]) -> Vec<FeatureImportance> {
    let mut pairs: Vec<FeatureImportance> = schema
        .iter()
        .zip(weights.iter())
        .map(|(name, weight)| FeatureImportance {
            name: name.to_string(),
            weight: *weight,
        })
        .collect();
    pairs.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    pairs.truncate(TOP_IMPORTANCES);
    pairs
}
