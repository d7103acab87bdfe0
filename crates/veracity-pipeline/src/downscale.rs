//! Image downscaling to the canonical working resolution.
//!
//! Every validated upload is reduced to an exact square canonical
//! resolution (default 256×256) before any further processing. This
//! bounds peak memory on constrained devices independently of the
//! model's input size, even when the two happen to coincide. The
//! result is re-encoded as a full-quality JPEG intermediate so hosts
//! can display it directly.
//!
//! Unlike an aspect-preserving fit, the output dimensions are exact:
//! non-square inputs are stretched. The classifier is trained on
//! square crops, so the distortion is part of the contract.

use std::fmt;

use image::ImageEncoder;
use serde::{Deserialize, Serialize};

use crate::asset::ImageAsset;
use crate::types::{PipelineConfig, PipelineError};

/// Resampling filter used when downscaling.
///
/// Ordered from fastest/lowest-quality to slowest/highest-quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DownscaleFilter {
    /// Nearest-neighbor: fastest, blocky artifacts.
    Nearest,
    /// Bilinear interpolation: fast, decent quality.
    Triangle,
    /// Bicubic (Catmull-Rom): moderate speed, good quality.
    CatmullRom,
    /// Lanczos with 3 lobes: slowest, sharpest/best for photos.
    Lanczos3,
}

impl Default for DownscaleFilter {
    fn default() -> Self {
        Self::Triangle
    }
}

impl DownscaleFilter {
    /// Convert to the `image` crate's `FilterType`.
    const fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Self::Nearest => image::imageops::FilterType::Nearest,
            Self::Triangle => image::imageops::FilterType::Triangle,
            Self::CatmullRom => image::imageops::FilterType::CatmullRom,
            Self::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for DownscaleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => f.write_str("Nearest"),
            Self::Triangle => f.write_str("Triangle"),
            Self::CatmullRom => f.write_str("CatmullRom"),
            Self::Lanczos3 => f.write_str("Lanczos3"),
        }
    }
}

/// Decode raw image bytes and reduce them to the canonical square
/// resolution, producing a displayable [`ImageAsset`].
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized, the data is corrupt, or JPEG re-encoding fails.
pub fn downscale(
    image_bytes: &[u8],
    config: &PipelineConfig,
) -> Result<ImageAsset, PipelineError> {
    if image_bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let size = config.canonical_size;
    let decoded = image::load_from_memory(image_bytes)?;
    let resized = decoded
        .resize_exact(size, size, config.downscale_filter.to_image_filter())
        .to_rgb8();

    let mut jpeg = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, config.jpeg_quality);
    encoder.write_image(
        resized.as_raw(),
        resized.width(),
        resized.height(),
        image::ExtendedColorType::Rgb8,
    )?;

    Ok(ImageAsset::new(jpeg, size, size))
}
