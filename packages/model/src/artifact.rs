//! Serialized model artifact
//!
//! A trained linfa model plus the metadata the web surface needs: the declared
//! input names and the class labels behind the model's integer class ids.

use std::fmt;
use std::path::Path;

use linfa::DatasetBase;
use linfa::traits::Predict;
use linfa_logistic::FittedLogisticRegression;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, ArrayView2, Axis, stack};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::inference::{Capabilities, ClassLabel, Classifier, ProbabilityTable};

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
/// # Unified type for the supported linfa classifiers
pub enum MLModel {
    DecisionTree(DecisionTree<f64, usize>),
    LogisticRegression(FittedLogisticRegression<f64, usize>),
}

impl fmt::Display for MLModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MLModel::DecisionTree(_) => write!(f, "Decision Tree Classification"),
            MLModel::LogisticRegression(_) => write!(f, "Logistic Regression Classification"),
        }
    }
}

/// A trained classifier with the metadata it was exported with
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Input names in the column order used during training
    pub feature_names: Vec<String>,
    /// Class id → label; when empty the class id itself is the label
    #[serde(default)]
    pub classes: Vec<ClassLabel>,
    pub model: MLModel,
}

impl ModelArtifact {
    pub fn new(feature_names: Vec<String>, classes: Vec<ClassLabel>, model: MLModel) -> Self {
        Self {
            feature_names,
            classes,
            model,
        }
    }

    /// Read and validate an artifact from disk
    pub fn from_path(path: impl AsRef<Path>) -> ModelResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let artifact = Self::from_slice(&bytes)?;
        tracing::debug!(
            path = %path.display(),
            model = %artifact.model,
            features = artifact.feature_names.len(),
            "Loaded model artifact"
        );
        Ok(artifact)
    }

    pub fn from_slice(bytes: &[u8]) -> ModelResult<Self> {
        let artifact: ModelArtifact = serde_json::from_slice(bytes)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn to_json_vec(&self) -> ModelResult<Vec<u8>> {
        Ok(serde_json::to_vec(&self)?)
    }

    fn validate(&self) -> ModelResult<()> {
        // fitted width must equal the declared names
        let trained = match &self.model {
            MLModel::DecisionTree(model) => model.feature_importance().len(),
            MLModel::LogisticRegression(model) => model.params().len(),
        };
        if trained != self.feature_names.len() {
            return Err(ModelError::SchemaMismatch {
                expected: self.feature_names.len(),
                actual: trained,
            });
        }
        Ok(())
    }

    fn class_label(&self, class_id: usize) -> ModelResult<ClassLabel> {
        if self.classes.is_empty() {
            return Ok(ClassLabel::Int(class_id as i64));
        }
        self.classes
            .get(class_id)
            .cloned()
            .ok_or_else(|| ModelError::UnknownClass {
                class_id,
                classes: format!("{:?}", self.classes),
            })
    }

    fn check_width(&self, rows: &ArrayView2<'_, f64>) -> ModelResult<()> {
        if rows.ncols() != self.feature_names.len() {
            return Err(ModelError::SchemaMismatch {
                expected: self.feature_names.len(),
                actual: rows.ncols(),
            });
        }
        Ok(())
    }
}

impl Classifier for ModelArtifact {
    fn kind(&self) -> String {
        self.model.to_string()
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn capabilities(&self) -> Capabilities {
        match &self.model {
            MLModel::DecisionTree(model) => Capabilities {
                predict_proba: false,
                feature_importances: Some(model.feature_importance()),
            },
            MLModel::LogisticRegression(_) => Capabilities {
                predict_proba: true,
                feature_importances: None,
            },
        }
    }

    fn predict(&self, rows: ArrayView2<'_, f64>) -> ModelResult<Vec<ClassLabel>> {
        self.check_width(&rows)?;
        let dataset = DatasetBase::from(rows.to_owned());
        let predictions: Array1<usize> = match &self.model {
            MLModel::DecisionTree(model) => model.predict(&dataset),
            MLModel::LogisticRegression(model) => model.predict(&dataset),
        };
        predictions
            .iter()
            .map(|class_id| self.class_label(*class_id))
            .collect()
    }

    fn predict_proba(&self, rows: ArrayView2<'_, f64>) -> ModelResult<ProbabilityTable> {
        self.check_width(&rows)?;
        match &self.model {
            MLModel::LogisticRegression(model) => {
                let positive = model.predict_probabilities(&rows);
                let negative = positive.mapv(|p| 1.0 - p);
                let probabilities: Array2<f64> =
                    stack(Axis(1), &[negative.view(), positive.view()])?;
                let labels = model.labels();
                Ok(ProbabilityTable {
                    classes: vec![
                        self.class_label(labels.neg.class)?,
                        self.class_label(labels.pos.class)?,
                    ],
                    probabilities,
                })
            }
            MLModel::DecisionTree(_) => Err(ModelError::Unsupported {
                model: self.kind(),
                capability: "probability estimates",
            }),
        }
    }
}
