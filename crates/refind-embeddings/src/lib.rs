//! # refind-embeddings
//!
//! ONNX-based visual embeddings and similarity matching.
//!
//! - [`FrameRegion`] — owned RGB8 camera frame regions
//! - [`VisionEmbedder`] — the embedding service trait, with
//!   [`MockVisionEmbedder`] for tests and the `ort`-backed [`OnnxEmbedder`]
//!   behind the `ort` feature
//! - Preprocessing: resize + ImageNet normalization into NCHW layout
//! - [`best_match`] — cosine similarity against a reference set
//! - [`ItemDetector`] / [`GridScanDetector`] — grid scan locating an item
//!   within a frame
//!
//! The ONNX engine tries compute backends in order (CUDA → CoreML → CPU);
//! the first session that constructs wins, and exhausting the list is a
//! permanent failure surfaced on every later call.

#![deny(unsafe_code)]

pub mod backend;
pub mod config;
pub mod detector;
#[cfg(feature = "ort")]
pub mod engine;
pub mod errors;
pub mod frame;
pub mod matcher;
pub mod normalize;
pub mod preprocess;
pub mod service;

pub use backend::ExecutionBackend;
pub use config::EmbedderConfig;
pub use detector::{Detection, GridScanDetector, ItemDetector};
#[cfg(feature = "ort")]
pub use engine::OnnxEmbedder;
pub use errors::{EmbeddingError, Result};
pub use frame::FrameRegion;
pub use matcher::{MatchOutcome, best_match};
pub use service::{EmbeddingOutput, MockVisionEmbedder, VisionEmbedder};
