//! Shared types for the veracity image preparation pipeline.

use serde::{Deserialize, Serialize};

use crate::downscale::DownscaleFilter;

/// Number of color channels in every tensor the pipeline produces.
pub const CHANNELS: usize = 3;

/// Configuration for the image preparation pipeline.
///
/// All parameters default to the values the classifier was trained
/// against: a 256×256 canonical working resolution, a 256×256 model
/// input, bilinear resampling, and a full-quality JPEG intermediate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Canonical downscale target in pixels. Every uploaded image is
    /// reduced to exactly this square resolution before any further
    /// processing, bounding peak memory on constrained devices. This
    /// is independent of the model input size, even though the two
    /// currently coincide.
    pub canonical_size: u32,

    /// Spatial size of the classifier's input tensor. The batched
    /// tensor handed to the model is `1 × size × size × 3`.
    pub model_input_size: u32,

    /// Resampling filter used by the downscaler.
    pub downscale_filter: DownscaleFilter,

    /// Quality of the JPEG-encoded canonical intermediate (1–100).
    pub jpeg_quality: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            canonical_size: 256,
            model_input_size: 256,
            downscale_filter: DownscaleFilter::default(),
            jpeg_quality: 100,
        }
    }
}

/// Errors that can occur while preparing an image for inference.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode or re-encode the image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,
}
