//! ONNX embedding engine (feature-gated behind `ort`).
//!
//! Loads a MobileNet-class vision model and produces L2-normalized feature
//! vectors from camera frame regions. Initialization walks the configured
//! execution-provider list in order — CUDA, then CoreML, then CPU — and
//! adopts the first provider that successfully constructs a session. When
//! every provider fails the engine is permanently failed: each subsequent
//! `embed` returns [`EmbeddingError::Unavailable`].

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::backend::ExecutionBackend;
use crate::config::EmbedderConfig;
use crate::errors::{EmbeddingError, Result};
use crate::frame::FrameRegion;
use crate::normalize::{l2_norm, l2_normalize};
use crate::preprocess::preprocess;
use crate::service::{EmbeddingOutput, VisionEmbedder};

/// Raw-magnitude divisor for the capture-confidence heuristic.
const CONFIDENCE_MAGNITUDE_SCALE: f32 = 50.0;

const STATE_UNINITIALIZED: u8 = 0;
const STATE_INITIALIZING: u8 = 1;
const STATE_READY: u8 = 2;
const STATE_FAILED: u8 = 3;

/// ONNX-based vision embedder.
///
/// One instance is shared process-wide via `Arc`; the atomic lifecycle state
/// guarantees a single load attempt with idempotent re-entry.
pub struct OnnxEmbedder {
    config: EmbedderConfig,
    session: parking_lot::Mutex<Option<ort::session::Session>>,
    adopted_backend: parking_lot::Mutex<Option<ExecutionBackend>>,
    state: AtomicU8,
}

impl OnnxEmbedder {
    /// Create a new engine (not yet initialized).
    #[must_use]
    pub fn new(config: EmbedderConfig) -> Self {
        Self {
            config,
            session: parking_lot::Mutex::new(None),
            adopted_backend: parking_lot::Mutex::new(None),
            state: AtomicU8::new(STATE_UNINITIALIZED),
        }
    }

    /// Initialize the engine: resolve model bytes, then try each configured
    /// backend in order until a session is constructed.
    ///
    /// Idempotent: re-entry while initializing or ready is a no-op. After a
    /// permanent failure, returns [`EmbeddingError::Unavailable`].
    ///
    /// Does blocking I/O internally (model download, session construction),
    /// wrapped in `spawn_blocking`.
    pub async fn initialize(&self) -> Result<()> {
        match self.state.compare_exchange(
            STATE_UNINITIALIZED,
            STATE_INITIALIZING,
            Ordering::SeqCst,
            Ordering::SeqCst,
        ) {
            Ok(_) => {}
            Err(STATE_READY | STATE_INITIALIZING) => return Ok(()),
            Err(_) => return Err(EmbeddingError::Unavailable),
        }

        let config = self.config.clone();
        let built = tokio::task::spawn_blocking(
            move || -> Result<(ort::session::Session, ExecutionBackend)> {
                let model_path = resolve_model(&config)?;
                info!(model = %model_path.display(), "loading ONNX model");
                build_session(&model_path, &config.backends)
            },
        )
        .await
        .map_err(|e| EmbeddingError::InitFailed(format!("join error: {e}")))
        .and_then(|r| r);

        match built {
            Ok((session, backend)) => {
                *self.session.lock() = Some(session);
                *self.adopted_backend.lock() = Some(backend);
                self.state.store(STATE_READY, Ordering::SeqCst);
                info!(backend = %backend, "embedding engine ready");
                Ok(())
            }
            Err(e) => {
                self.state.store(STATE_FAILED, Ordering::SeqCst);
                warn!(error = %e, "embedding engine failed permanently");
                Err(e)
            }
        }
    }

    /// The backend adopted during initialization, if ready.
    pub fn backend(&self) -> Option<ExecutionBackend> {
        *self.adopted_backend.lock()
    }

    /// Release the inference session. A disposed engine can be initialized
    /// again from scratch.
    pub fn dispose(&self) {
        let _ = self.session.lock().take();
        let _ = self.adopted_backend.lock().take();
        self.state.store(STATE_UNINITIALIZED, Ordering::SeqCst);
        debug!("embedding engine disposed");
    }
}

/// Resolve the model file: an explicit local path wins, otherwise the file
/// is fetched (and cached) via `hf-hub`.
fn resolve_model(config: &EmbedderConfig) -> Result<PathBuf> {
    if let Some(path) = &config.model_path {
        return Ok(PathBuf::from(path));
    }

    let cache_dir = config.resolved_cache_dir();
    debug!(cache_dir, repo = %config.model_repo, "fetching model via hf-hub");

    let api = hf_hub::api::sync::ApiBuilder::new()
        .with_cache_dir(PathBuf::from(&cache_dir))
        .build()
        .map_err(|e| EmbeddingError::InitFailed(format!("hf-hub api: {e}")))?;

    let repo = api.model(config.model_repo.clone());
    repo.get(&config.model_file)
        .map_err(|e| EmbeddingError::InitFailed(format!("model download ({}): {e}", config.model_file)))
}

/// Try each backend in order; first successful session wins.
fn build_session(
    model_path: &Path,
    backends: &[ExecutionBackend],
) -> Result<(ort::session::Session, ExecutionBackend)> {
    let mut last_error: Option<String> = None;

    for &backend in backends {
        match try_build_session(model_path, backend) {
            Ok(session) => {
                info!(backend = %backend, "inference session constructed");
                return Ok((session, backend));
            }
            Err(e) => {
                warn!(backend = %backend, error = %e, "backend failed, trying next");
                last_error = Some(e.to_string());
            }
        }
    }

    Err(EmbeddingError::InitFailed(format!(
        "all backends failed; last error: {}",
        last_error.unwrap_or_else(|| "no backends configured".into())
    )))
}

fn try_build_session(
    model_path: &Path,
    backend: ExecutionBackend,
) -> Result<ort::session::Session> {
    ort::session::Session::builder()
        .map_err(|e| EmbeddingError::InitFailed(format!("session builder: {e}")))?
        .with_execution_providers([backend.dispatch()])
        .map_err(|e| EmbeddingError::InitFailed(format!("provider registration: {e}")))?
        .with_intra_threads(2)
        .map_err(|e| EmbeddingError::InitFailed(format!("thread config: {e}")))?
        .with_log_level(ort::logging::LogLevel::Warning)
        .map_err(|e| EmbeddingError::InitFailed(format!("log level: {e}")))?
        .commit_from_file(model_path)
        .map_err(|e| EmbeddingError::InitFailed(format!("model load: {e}")))
}

/// Run one inference call and post-process the output vector.
fn run_inference(
    session: &mut ort::session::Session,
    region: &FrameRegion,
    config: &EmbedderConfig,
) -> Result<EmbeddingOutput> {
    let input = preprocess(region, config.input_size)?;

    let tensor = ort::value::Tensor::from_array((input.shape, input.data))
        .map_err(|e| EmbeddingError::Inference(format!("input tensor: {e}")))?;

    let outputs = session
        .run(ort::inputs![tensor])
        .map_err(|e| EmbeddingError::Inference(format!("inference: {e}")))?;

    let (output_shape, output_data) = outputs[0]
        .try_extract_tensor::<f32>()
        .map_err(|e| EmbeddingError::Inference(format!("extract tensor: {e}")))?;

    // Expect [1, D]; tolerate extra singleton dims
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let dims: Vec<usize> = output_shape.iter().map(|&d| d as usize).collect();
    if dims.first() != Some(&1) {
        return Err(EmbeddingError::Inference(format!(
            "unexpected output shape: {output_shape:?}"
        )));
    }

    let mut vector = output_data.to_vec();
    let magnitude = l2_norm(&vector);
    if magnitude > 0.0 {
        l2_normalize(&mut vector);
    }

    Ok(EmbeddingOutput {
        vector,
        capture_confidence: (magnitude / CONFIDENCE_MAGNITUDE_SCALE).min(1.0),
    })
}

#[async_trait]
impl VisionEmbedder for OnnxEmbedder {
    async fn embed(&self, region: &FrameRegion) -> Result<EmbeddingOutput> {
        match self.state.load(Ordering::SeqCst) {
            STATE_READY => {}
            STATE_FAILED => return Err(EmbeddingError::Unavailable),
            _ => return Err(EmbeddingError::NotReady),
        }

        let mut session_guard = self.session.lock();
        let session = session_guard.as_mut().ok_or(EmbeddingError::NotReady)?;
        run_inference(session, region, &self.config)
    }

    fn is_ready(&self) -> bool {
        self.state.load(Ordering::SeqCst) == STATE_READY
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn engine_implements_trait() {
        fn assert_embedder<T: VisionEmbedder>() {}
        assert_embedder::<OnnxEmbedder>();
    }

    #[tokio::test]
    async fn embed_before_init_is_not_ready() {
        let engine = OnnxEmbedder::new(EmbedderConfig::default());
        assert!(!engine.is_ready());
        let result = engine.embed(&FrameRegion::solid(4, 4, [0, 0, 0])).await;
        assert_matches!(result, Err(EmbeddingError::NotReady));
    }

    #[tokio::test]
    async fn failed_engine_reports_unavailable() {
        // A nonexistent local model path fails on every backend.
        let config = EmbedderConfig {
            model_path: Some("/nonexistent/model.onnx".into()),
            ..EmbedderConfig::default()
        };
        let engine = OnnxEmbedder::new(config);

        let init = engine.initialize().await;
        assert_matches!(init, Err(EmbeddingError::InitFailed(_)));
        assert!(!engine.is_ready());

        let embed = engine.embed(&FrameRegion::solid(4, 4, [0, 0, 0])).await;
        assert_matches!(embed, Err(EmbeddingError::Unavailable));

        // a second initialize attempt does not resurrect a failed engine
        let again = engine.initialize().await;
        assert_matches!(again, Err(EmbeddingError::Unavailable));
    }

    #[test]
    fn dispose_without_init_is_harmless() {
        let engine = OnnxEmbedder::new(EmbedderConfig::default());
        engine.dispose();
        assert!(!engine.is_ready());
        assert!(engine.backend().is_none());
    }
}
