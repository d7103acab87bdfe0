//! Error taxonomy for one upload run.

use veracity_pipeline::PipelineError;

/// Errors that terminate an upload run.
///
/// None of these are retried: the only recovery path is the user
/// re-initiating a new upload. Each error is surfaced at most once via
/// the controller's error callback, always paired with a state reset
/// and a score clear.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The selection event carried no files. Resets the controller
    /// silently, with no user-facing message.
    #[error("no file selected")]
    NoFileSelected,

    /// The selected file's MIME type is not an accepted image type.
    #[error("unsupported file type {content_type:?}: please select a JPEG or PNG image")]
    UnsupportedFileType {
        /// The rejected MIME type, for the user-facing message.
        content_type: String,
    },

    /// The image could not be decoded or prepared for inference.
    #[error("could not read the selected image: {0}")]
    ImageDecode(#[from] PipelineError),

    /// Inference was attempted while no classifier handle was
    /// available (model still loading, or it failed to load).
    #[error("the model is still loading, try again in a moment")]
    ModelUnavailable,

    /// The classifier violated its output contract (expected a 1×2
    /// score matrix).
    #[error("the classifier returned an unexpected output shape")]
    UnexpectedOutput,
}

impl UploadError {
    /// Whether this error resets the controller without invoking the
    /// error callback.
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::NoFileSelected)
    }
}
