//! Error types for model loading and inference

use thiserror::Error;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while loading a model artifact or running inference
#[derive(Error, Debug)]
pub enum ModelError {
    /// The artifact could not be read from disk
    #[error("Failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The artifact is not a valid serialized model
    #[error("Failed to parse model artifact: {0}")]
    Json(#[from] serde_json::Error),

    /// A feature vector could not be shaped into a row matrix
    #[error("Invalid feature matrix shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// The feature vector width does not match the model's declared inputs
    #[error("Feature vector has {actual} columns, model expects {expected}")]
    SchemaMismatch { expected: usize, actual: usize },

    /// The model produced a class id outside of its class list
    #[error("Couldn't map prediction {class_id} to any of these classes {classes}")]
    UnknownClass { class_id: usize, classes: String },

    /// The model returned no rows
    #[error("Got an empty prediction")]
    EmptyPrediction,

    /// The model does not implement the requested capability
    #[error("{model} does not support {capability}")]
    Unsupported {
        model: String,
        capability: &'static str,
    },

    /// The positive class column is missing from a probability table
    #[error("Probability table has {columns} columns, cannot read column {index}")]
    ProbabilityColumn { index: usize, columns: usize },
}
