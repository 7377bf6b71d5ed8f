//! Embedding engine configuration.

use serde::{Deserialize, Serialize};

use refind_settings::EmbeddingSettings;

use crate::backend::ExecutionBackend;

/// Configuration for the ONNX embedding engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbedderConfig {
    /// Hugging Face repository holding the ONNX model.
    pub model_repo: String,
    /// Model file within the repository.
    pub model_file: String,
    /// Optional local model path; when set, no download is attempted.
    pub model_path: Option<String>,
    /// Square input resolution expected by the model.
    pub input_size: u32,
    /// Output embedding dimensionality.
    pub dimensions: usize,
    /// Local model cache directory (may contain `~`).
    pub cache_dir: String,
    /// Compute backends to try, in order; first success wins.
    pub backends: Vec<ExecutionBackend>,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self::from_settings(&EmbeddingSettings::default())
    }
}

impl EmbedderConfig {
    /// Create config from settings, with the default backend order.
    pub fn from_settings(s: &EmbeddingSettings) -> Self {
        Self {
            model_repo: s.model_repo.clone(),
            model_file: s.model_file.clone(),
            model_path: None,
            input_size: s.input_size,
            dimensions: s.dimensions,
            cache_dir: s.cache_dir.clone(),
            backends: ExecutionBackend::default_order(),
        }
    }

    /// Resolve the cache directory, expanding `~/` to the home directory.
    pub fn resolved_cache_dir(&self) -> String {
        if self.cache_dir.starts_with("~/") {
            if let Ok(home) = std::env::var("HOME") {
                return format!("{}{}", home, &self.cache_dir[1..]);
            }
        }
        self.cache_dir.clone()
    }
}
