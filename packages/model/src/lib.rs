//! Legendex model layer
//!
//! Turns a submitted creature description into the feature vector a trained
//! classifier expects, and wraps the classifier behind a small read-only
//! inference contract. The HTTP surface lives in `legendex-api`.

pub mod artifact;
pub mod encoder;
pub mod error;
pub mod inference;
pub mod schema;

#[cfg(test)]
mod tests;

pub use artifact::{MLModel, ModelArtifact};
pub use encoder::{EncodedFeatures, NamedValue, RawInput, encode};
pub use error::{ModelError, ModelResult};
pub use inference::{
    Capabilities, ClassLabel, Classifier, FeatureImportance, InferenceAdapter, Prediction,
    ProbabilityTable,
};
pub use schema::{COLOR_FEATURES, FeatureSchema, TYPE_FEATURES};

/// Load the artifact at `path` and wrap it for serving
pub fn load_adapter(path: impl AsRef<std::path::Path>) -> ModelResult<InferenceAdapter> {
    let artifact = ModelArtifact::from_path(path)?;
    Ok(InferenceAdapter::new(Box::new(artifact)))
}
