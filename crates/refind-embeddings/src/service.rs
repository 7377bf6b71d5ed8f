//! The embedder service trait and its deterministic test double.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::errors::Result;
use crate::frame::FrameRegion;
use crate::normalize::{l2_norm, l2_normalize};

/// Output of one embedding call.
#[derive(Clone, Debug, PartialEq)]
pub struct EmbeddingOutput {
    /// L2-normalized feature vector (all zeros when the raw output magnitude
    /// was zero — normalization is skipped and downstream confidence is 0).
    pub vector: Vec<f32>,
    /// Capture-quality heuristic in `[0, 1]` derived from the raw magnitude.
    pub capture_confidence: f32,
}

/// Produces a fixed-length normalized feature vector from an image region.
///
/// Implemented by the ONNX engine in production and by
/// [`MockVisionEmbedder`] in tests.
#[async_trait]
pub trait VisionEmbedder: Send + Sync {
    /// Embed one frame region.
    async fn embed(&self, region: &FrameRegion) -> Result<EmbeddingOutput>;

    /// Whether the model is loaded and inference is possible.
    fn is_ready(&self) -> bool;

    /// Output vector dimensionality.
    fn dimensions(&self) -> usize;
}

#[async_trait]
impl<T: VisionEmbedder + ?Sized> VisionEmbedder for std::sync::Arc<T> {
    async fn embed(&self, region: &FrameRegion) -> Result<EmbeddingOutput> {
        (**self).embed(region).await
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }
}

/// Deterministic in-memory embedder for tests.
///
/// The vector is seeded from a SHA-256 digest of the pixel buffer: identical
/// regions always embed identically, and visually distinct regions land far
/// apart, which is enough to exercise matching and session logic.
pub struct MockVisionEmbedder {
    dims: usize,
}

impl MockVisionEmbedder {
    /// Create a mock embedder with the given output dimensionality.
    #[must_use]
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }
}

#[async_trait]
impl VisionEmbedder for MockVisionEmbedder {
    async fn embed(&self, region: &FrameRegion) -> Result<EmbeddingOutput> {
        let digest = Sha256::digest(&region.pixels);

        let mut vector: Vec<f32> = (0..self.dims)
            .map(|i| {
                let byte = digest[i % digest.len()];
                // spread deterministic bytes across [-1, 1]
                (f32::from(byte) / 127.5 - 1.0) * (1.0 + (i / digest.len()) as f32 * 0.01)
            })
            .collect();

        let magnitude = l2_norm(&vector);
        if magnitude > 0.0 {
            l2_normalize(&mut vector);
        }
        Ok(EmbeddingOutput {
            vector,
            capture_confidence: (magnitude / 50.0).min(1.0),
        })
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn dimensions(&self) -> usize {
        self.dims
    }
}
