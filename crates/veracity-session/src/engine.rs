//! Inference invocation over the classifier seam.

use tracing::debug;
use veracity_pipeline::{BatchedTensor, ScoreVector};

use crate::classify::ClassifierProvider;
use crate::error::UploadError;

/// Executes one forward pass per upload run.
///
/// The engine reads the classifier handle at call time, never caching
/// it across runs, and takes ownership of the input tensor so the
/// buffer is released on every exit path — including the
/// unavailable-model failure.
pub struct InferenceEngine<'a> {
    provider: &'a dyn ClassifierProvider,
}

impl<'a> InferenceEngine<'a> {
    /// Create an engine reading handles from the given provider.
    #[must_use]
    pub const fn new(provider: &'a dyn ClassifierProvider) -> Self {
        Self { provider }
    }

    /// Run a single forward pass and extract the score vector.
    ///
    /// The model is invoked at most once per upload; failed inference
    /// is never retried.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::ModelUnavailable`] if no classifier
    /// handle is currently loaded. Returns
    /// [`UploadError::UnexpectedOutput`] if the output is not a 1×2
    /// score matrix.
    pub async fn infer(&self, input: BatchedTensor) -> Result<ScoreVector, UploadError> {
        let Some(classifier) = self.provider.classifier() else {
            // `input` drops here, releasing the batched buffer even
            // though no forward pass ran.
            return Err(UploadError::ModelUnavailable);
        };

        let output = classifier.predict(&input).await;
        drop(input);
        debug!(shape = ?output.shape(), "forward pass complete");

        let row = output
            .rows()
            .into_iter()
            .next()
            .filter(|row| row.len() == 2)
            .ok_or(UploadError::UnexpectedOutput)?;
        Ok(ScoreVector::new(row[0], row[1]))
    }
}
