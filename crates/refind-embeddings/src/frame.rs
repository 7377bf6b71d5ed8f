//! Camera frame regions.
//!
//! The camera source is an external collaborator; the pipeline consumes one
//! rectangular RGB region per call. A [`FrameRegion`] is a plain owned pixel
//! buffer so it can cross `spawn_blocking` boundaries without lifetimes.

use image::RgbImage;

use crate::errors::{EmbeddingError, Result};

/// One rectangular RGB8 region of a camera frame, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRegion {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Packed RGB8 data, `width * height * 3` bytes.
    pub pixels: Vec<u8>,
}

impl FrameRegion {
    /// Build a region from raw parts, validating the buffer length.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(EmbeddingError::InvalidFrame(format!(
                "expected {expected} bytes for {width}x{height} RGB8, got {}",
                pixels.len()
            )));
        }
        if width == 0 || height == 0 {
            return Err(EmbeddingError::InvalidFrame("zero-sized region".into()));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a uniformly colored region (test frames, calibration cards).
    #[must_use]
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// View this region as an [`RgbImage`] for resize operations.
    pub(crate) fn to_rgb_image(&self) -> Result<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.pixels.clone()).ok_or_else(|| {
            EmbeddingError::InvalidFrame("pixel buffer does not match dimensions".into())
        })
    }

    /// Copy out a sub-rectangle. Coordinates are clamped to the region.
    #[must_use]
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        let width = width.min(self.width - x).max(1);
        let height = height.min(self.height - y).max(1);

        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for row in y..y + height {
            let start = (row as usize * self.width as usize + x as usize) * 3;
            let end = start + width as usize * 3;
            pixels.extend_from_slice(&self.pixels[start..end]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }
}
