//! Frame-level detection: locating a learned item within a camera frame.
//!
//! The grid detector splits the frame into a coarse grid, embeds each cell,
//! and matches every cell against the item's reference vectors. The best
//! cell supplies both the match confidence and the normalized bounding box
//! that drives directional guidance.

use async_trait::async_trait;

use refind_core::{BoundingBox, MATCH_THRESHOLD};

use crate::errors::Result;
use crate::frame::FrameRegion;
use crate::matcher::best_match;
use crate::service::VisionEmbedder;

/// Grid resolution of the region scan (3×3 cells).
const GRID_SIZE: u32 = 3;

/// Cells scoring below this similarity are not considered candidate
/// locations even when another cell produces an overall match.
const CELL_SIMILARITY_FLOOR: f32 = 0.5;

/// One located match within a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    /// Best cosine similarity across the scanned cells, in `[0, 1]` for
    /// matched detections.
    pub confidence: f32,
    /// Normalized location of the best-scoring cell.
    pub bounding_box: BoundingBox,
}

/// Locates a learned item in a frame given its reference vectors.
///
/// Trait seam so the session controller can be tested with scripted
/// detections at exact positions and confidences.
#[async_trait]
pub trait ItemDetector: Send + Sync {
    /// Scan a frame for the item. `Ok(None)` means no detection this frame.
    async fn detect(
        &self,
        frame: &FrameRegion,
        references: &[Vec<f32>],
    ) -> Result<Option<Detection>>;
}

/// Production detector: 3×3 grid scan over the embedder.
pub struct GridScanDetector<E> {
    embedder: E,
}

impl<E: VisionEmbedder> GridScanDetector<E> {
    /// Create a detector over the given embedder.
    pub fn new(embedder: E) -> Self {
        Self { embedder }
    }
}

#[async_trait]
impl<E: VisionEmbedder> ItemDetector for GridScanDetector<E> {
    async fn detect(
        &self,
        frame: &FrameRegion,
        references: &[Vec<f32>],
    ) -> Result<Option<Detection>> {
        if references.is_empty() {
            return Ok(None);
        }

        let cell_width = (frame.width / GRID_SIZE).max(1);
        let cell_height = (frame.height / GRID_SIZE).max(1);

        let mut best: Option<(f32, f32, BoundingBox)> = None;

        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let cell = frame.crop(col * cell_width, row * cell_height, cell_width, cell_height);
                let output = self.embedder.embed(&cell).await?;
                let outcome = best_match(&output.vector, references);

                if outcome.best_score < CELL_SIMILARITY_FLOOR {
                    continue;
                }

                // rank by similarity weighted by capture quality
                let rank = outcome.best_score * output.capture_confidence.max(f32::EPSILON);
                let replace = match &best {
                    Some((existing_rank, _, _)) => rank > *existing_rank,
                    None => true,
                };
                if replace {
                    #[allow(clippy::cast_precision_loss)]
                    let bbox = BoundingBox {
                        x: col as f32 / GRID_SIZE as f32,
                        y: row as f32 / GRID_SIZE as f32,
                        width: 1.0 / GRID_SIZE as f32,
                        height: 1.0 / GRID_SIZE as f32,
                    };
                    best = Some((rank, outcome.best_score, bbox));
                }
            }
        }

        match best {
            Some((_, confidence, bounding_box)) if confidence >= MATCH_THRESHOLD => {
                Ok(Some(Detection {
                    confidence,
                    bounding_box,
                }))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MockVisionEmbedder;

    fn checkerboard(width: u32, height: u32, left: [u8; 3], right: [u8; 3]) -> FrameRegion {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for _y in 0..height {
            for x in 0..width {
                let rgb = if x < width / 3 { left } else { right };
                pixels.extend_from_slice(&rgb);
            }
        }
        FrameRegion::new(width, height, pixels).unwrap()
    }

    #[tokio::test]
    async fn empty_references_yield_none() {
        let detector = GridScanDetector::new(MockVisionEmbedder::new(64));
        let frame = FrameRegion::solid(9, 9, [10, 10, 10]);
        let detection = detector.detect(&frame, &[]).await.unwrap();
        assert!(detection.is_none());
    }

    #[tokio::test]
    async fn finds_taught_appearance_in_frame() {
        let embedder = MockVisionEmbedder::new(64);
        // teach: embed a solid patch matching the left-column cells
        let taught = embedder
            .embed(&FrameRegion::solid(3, 3, [200, 30, 30]))
            .await
            .unwrap();

        let detector = GridScanDetector::new(MockVisionEmbedder::new(64));
        // frame whose left third is exactly the taught appearance
        let frame = checkerboard(9, 9, [200, 30, 30], [5, 5, 5]);
        let detection = detector
            .detect(&frame, std::slice::from_ref(&taught.vector))
            .await
            .unwrap();

        let detection = detection.expect("left column should match");
        assert!(detection.confidence > 0.99);
        assert!(detection.bounding_box.x < 0.34, "match is in the left column");
    }

    #[tokio::test]
    async fn unrelated_frame_yields_none() {
        let embedder = MockVisionEmbedder::new(64);
        let taught = embedder
            .embed(&FrameRegion::solid(3, 3, [200, 30, 30]))
            .await
            .unwrap();

        // orthogonalize: reference deliberately unlike any uniform frame cell
        let mut reference = taught.vector.clone();
        for (i, v) in reference.iter_mut().enumerate() {
            if i % 2 == 0 {
                *v = -*v;
            }
        }

        let detector = GridScanDetector::new(MockVisionEmbedder::new(64));
        let frame = FrameRegion::solid(9, 9, [5, 200, 5]);
        let detection = detector.detect(&frame, &[reference]).await.unwrap();
        assert!(detection.is_none());
    }

    #[tokio::test]
    async fn bounding_box_is_normalized() {
        // the embedder is shared between the teach path and the detector,
        // mirroring the production single-engine composition
        let embedder = std::sync::Arc::new(MockVisionEmbedder::new(64));
        let taught = embedder
            .embed(&FrameRegion::solid(3, 3, [90, 90, 90]))
            .await
            .unwrap();

        let detector = GridScanDetector::new(std::sync::Arc::clone(&embedder));
        let frame = FrameRegion::solid(9, 9, [90, 90, 90]);
        let detection = detector
            .detect(&frame, &[taught.vector])
            .await
            .unwrap()
            .expect("uniform frame matches everywhere");
        let bbox = detection.bounding_box;
        assert!((0.0..=1.0).contains(&bbox.x));
        assert!((0.0..=1.0).contains(&(bbox.x + bbox.width)));
        assert!((0.0..=1.0).contains(&(bbox.y + bbox.height)));
    }
}
