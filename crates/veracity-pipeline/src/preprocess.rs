//! Tensor construction from a canonical image asset.
//!
//! Turns an [`ImageAsset`] into the batched float tensor the
//! classifier consumes:
//!
//! 1. decode the asset's pixel data into a [`PixelTensor`],
//! 2. resize bilinearly to the model input size, converting to `f32`
//!    (no further normalization — the model is trained on raw 0–255
//!    floats),
//! 3. release the pixel tensor,
//! 4. add a leading batch axis of 1, producing a [`BatchedTensor`],
//! 5. consume the unbatched intermediate.
//!
//! Buffer discipline: at no point are more than two tracked buffers
//! from this stage live at once, and every buffer is released exactly
//! once on every exit path. The only failure mode of this stage is a
//! propagated decode error from step 1.

use crate::asset::ImageAsset;
use crate::tensor::{BatchedTensor, PixelTensor, TensorArena};
use crate::types::{PipelineConfig, PipelineError};

/// Build the classifier input tensor from a canonical image asset.
///
/// # Errors
///
/// Returns [`PipelineError::ImageDecode`] if the asset's pixel data
/// fails to decode.
pub fn preprocess(
    asset: &ImageAsset,
    config: &PipelineConfig,
    arena: &TensorArena,
) -> Result<BatchedTensor, PipelineError> {
    let rgb = asset.to_rgb()?;
    let pixels = PixelTensor::from_image(&rgb, arena);
    let resized = pixels.resize_bilinear(config.model_input_size, arena);
    Ok(resized.into_batched())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::downscale::downscale;

    /// Encode a half-black/half-white PNG for testing.
    fn sharp_edge_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, |x, _y| {
            if x < width / 2 {
                image::Rgba([0, 0, 0, 255])
            } else {
                image::Rgba([255, 255, 255, 255])
            }
        });
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    fn canonical_asset() -> ImageAsset {
        downscale(&sharp_edge_png(300, 200), &PipelineConfig::default()).unwrap()
    }

    #[test]
    fn produces_model_input_shape() {
        let arena = TensorArena::new();
        let batched = preprocess(&canonical_asset(), &PipelineConfig::default(), &arena).unwrap();
        assert_eq!(batched.shape(), [1, 256, 256, 3]);
    }

    #[test]
    fn at_most_two_buffers_live_and_none_leak() {
        let arena = TensorArena::new();
        let batched = preprocess(&canonical_asset(), &PipelineConfig::default(), &arena).unwrap();
        assert_eq!(arena.peak(), 2);
        assert_eq!(arena.live(), 1, "only the batched tensor outlives the stage");
        drop(batched);
        assert_eq!(arena.live(), 0);
    }

    #[test]
    fn float_values_span_pixel_range() {
        let arena = TensorArena::new();
        let batched = preprocess(&canonical_asset(), &PipelineConfig::default(), &arena).unwrap();
        let view = batched.view();
        // Left edge is black, right edge is white (JPEG ringing aside).
        assert!(view[(0, 100, 5, 0)] < 64.0);
        assert!(view[(0, 100, 250, 0)] > 192.0);
    }

    #[test]
    fn honors_configured_model_input_size() {
        let config = PipelineConfig {
            model_input_size: 64,
            ..PipelineConfig::default()
        };
        let arena = TensorArena::new();
        let asset = downscale(&sharp_edge_png(300, 200), &config).unwrap();
        let batched = preprocess(&asset, &config, &arena).unwrap();
        assert_eq!(batched.shape(), [1, 64, 64, 3]);
    }

    #[test]
    fn decode_failure_leaves_no_buffers() {
        let arena = TensorArena::new();
        let bogus = ImageAsset::new(vec![0xDE, 0xAD], 256, 256);
        let result = preprocess(&bogus, &PipelineConfig::default(), &arena);
        assert!(matches!(result, Err(PipelineError::ImageDecode(_))));
        assert_eq!(arena.live(), 0);
    }
}
