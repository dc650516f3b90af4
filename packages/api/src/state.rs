use std::path::PathBuf;
use std::sync::Arc;

use legendex_model::InferenceAdapter;

use crate::flash::FlashKey;
use crate::templates::Templates;

pub type AppState = Arc<State>;

/// Process-wide resources, built once at startup and shared read-only by every request
pub struct State {
    pub adapter: InferenceAdapter,
    pub templates: Templates,
    pub flash_key: FlashKey,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
}

impl State {
    pub fn new(
        adapter: InferenceAdapter,
        secret_key: &str,
        static_dir: impl Into<PathBuf>,
    ) -> Result<Self, minijinja::Error> {
        Ok(Self {
            adapter,
            templates: Templates::new()?,
            flash_key: FlashKey::new(secret_key),
            static_dir: static_dir.into(),
        })
    }
}
