//! Canonical image asset produced by the downscaler.

use image::RgbImage;

use crate::types::PipelineError;

/// A decoded, displayable image at the canonical downscale resolution.
///
/// Stored as a JPEG-encoded intermediate so hosts can show it directly
/// (e.g. as a preview) without re-encoding. Owned exclusively by the
/// upload run that created it and dropped when the run ends.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl ImageAsset {
    pub(crate) const fn new(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            width,
            height,
        }
    }

    /// The JPEG-encoded image bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Asset width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Asset height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Decode the asset back into raw RGB pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ImageDecode`] if the stored bytes fail
    /// to decode. This should not happen for assets produced by the
    /// downscaler, but the asset type does not guarantee where its
    /// bytes came from.
    pub fn to_rgb(&self) -> Result<RgbImage, PipelineError> {
        Ok(image::load_from_memory(&self.bytes)?.to_rgb8())
    }
}
