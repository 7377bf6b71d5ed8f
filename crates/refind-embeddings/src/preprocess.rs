//! Frame preprocessing for the vision model.
//!
//! Resizes an RGB region to the model's square input resolution, applies
//! per-channel ImageNet normalization, and lays the result out as an NCHW
//! tensor buffer.

use image::imageops::FilterType;

use crate::errors::Result;
use crate::frame::FrameRegion;

/// ImageNet per-channel mean (RGB), required by MobileNet-family models.
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// ImageNet per-channel standard deviation (RGB).
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Preprocessed model input: flat NCHW buffer plus its shape.
#[derive(Clone, Debug)]
pub struct TensorInput {
    /// `[1, 3, size, size]`.
    pub shape: Vec<i64>,
    /// `3 * size * size` floats, channel-major.
    pub data: Vec<f32>,
}

/// Resize and normalize a frame region into model input layout.
pub fn preprocess(region: &FrameRegion, input_size: u32) -> Result<TensorInput> {
    let img = region.to_rgb_image()?;
    let resized = image::imageops::resize(&img, input_size, input_size, FilterType::Triangle);

    let pixels = input_size as usize * input_size as usize;
    let mut data = vec![0.0f32; 3 * pixels];

    for (i, pixel) in resized.pixels().enumerate() {
        for c in 0..3 {
            let value = f32::from(pixel.0[c]) / 255.0;
            data[c * pixels + i] = (value - IMAGENET_MEAN[c]) / IMAGENET_STD[c];
        }
    }

    Ok(TensorInput {
        shape: vec![1, 3, i64::from(input_size), i64::from(input_size)],
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_shape_and_length() {
        let region = FrameRegion::solid(64, 48, [128, 128, 128]);
        let input = preprocess(&region, 224).unwrap();
        assert_eq!(input.shape, vec![1, 3, 224, 224]);
        assert_eq!(input.data.len(), 3 * 224 * 224);
    }

    #[test]
    fn black_pixels_normalize_to_negative_mean_over_std() {
        let region = FrameRegion::solid(8, 8, [0, 0, 0]);
        let input = preprocess(&region, 8).unwrap();
        let pixels = 64;
        for c in 0..3 {
            let expected = (0.0 - IMAGENET_MEAN[c]) / IMAGENET_STD[c];
            assert!(
                (input.data[c * pixels] - expected).abs() < 1e-5,
                "channel {c}"
            );
        }
    }

    #[test]
    fn white_pixels_normalize_to_one_minus_mean_over_std() {
        let region = FrameRegion::solid(8, 8, [255, 255, 255]);
        let input = preprocess(&region, 8).unwrap();
        let pixels = 64;
        for c in 0..3 {
            let expected = (1.0 - IMAGENET_MEAN[c]) / IMAGENET_STD[c];
            assert!(
                (input.data[c * pixels] - expected).abs() < 1e-5,
                "channel {c}"
            );
        }
    }

    #[test]
    fn channels_are_planar() {
        // red-only image: R channel high, G/B at the black level
        let region = FrameRegion::solid(8, 8, [255, 0, 0]);
        let input = preprocess(&region, 8).unwrap();
        let pixels = 64;

        let r = input.data[0];
        let g = input.data[pixels];
        let b = input.data[2 * pixels];
        assert!(r > 0.0, "red channel should be above the mean");
        assert!(g < 0.0, "green channel should be below the mean");
        assert!(b < 0.0, "blue channel should be below the mean");
    }

    #[test]
    fn upscales_small_regions() {
        let region = FrameRegion::solid(2, 2, [10, 20, 30]);
        let input = preprocess(&region, 32).unwrap();
        assert_eq!(input.data.len(), 3 * 32 * 32);
    }
}
