//! Embedding error types.
//!
//! Initialization failures are fatal — once every compute backend has been
//! exhausted the engine never produces embeddings and callers must surface a
//! capability error. Per-call inference failures are transient and are
//! degraded at the tick boundary by the session controller.

use thiserror::Error;

/// Errors from embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Model initialization failed on every configured backend.
    #[error("Model initialization failed: {0}")]
    InitFailed(String),

    /// The engine has not been initialized yet.
    #[error("Embedding engine not ready")]
    NotReady,

    /// The engine failed initialization permanently; no embeddings are
    /// possible for the lifetime of the process.
    #[error("Embedding model unavailable")]
    Unavailable,

    /// A frame region could not be converted to the model input.
    #[error("Preprocess failed: {0}")]
    Preprocess(String),

    /// A single inference call failed.
    #[error("Inference failed: {0}")]
    Inference(String),

    /// The supplied frame buffer was malformed.
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),
}

/// Result alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;
