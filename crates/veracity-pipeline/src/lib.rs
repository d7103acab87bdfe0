//! veracity-pipeline: Pure image preparation pipeline (sans-IO).
//!
//! Converts an uploaded image into the classifier's input tensor:
//! downscale to canonical resolution -> decode to pixel buffer ->
//! bilinear resize + float conversion -> batch.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns structured data. File selection, the
//! classifier seam, and the upload state machine live in
//! `veracity-session`.

pub mod asset;
pub mod downscale;
pub mod preprocess;
pub mod score;
pub mod tensor;
pub mod types;

pub use asset::ImageAsset;
pub use downscale::{DownscaleFilter, downscale};
pub use preprocess::preprocess;
pub use score::{ScoreVector, Verdict};
pub use tensor::{BatchedTensor, TensorArena};
pub use types::{PipelineConfig, PipelineError};

/// Prepare raw upload bytes for inference in one call.
///
/// Runs the downscaler and the preprocessing pipeline back to back,
/// returning the batched tensor ready for a forward pass. The
/// canonical [`ImageAsset`] intermediate is dropped; callers that want
/// to display it should run [`downscale`] and [`preprocess`]
/// separately.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image cannot be
/// decoded.
pub fn prepare(
    image_bytes: &[u8],
    config: &PipelineConfig,
    arena: &TensorArena,
) -> Result<BatchedTensor, PipelineError> {
    let asset = downscale(image_bytes, config)?;
    preprocess(&asset, config, arena)
}
