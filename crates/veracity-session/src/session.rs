//! Per-upload orchestration of the full pipeline.

use std::rc::Rc;

use tracing::{debug, info, warn};
use veracity_pipeline::{PipelineConfig, ScoreVector, TensorArena, downscale, preprocess};

use crate::classify::ClassifierProvider;
use crate::engine::InferenceEngine;
use crate::error::UploadError;
use crate::select::{self, FileSelection};
use crate::state::{StateController, UploadState};

/// Drives one upload at a time through validation, downscaling,
/// preprocessing, and inference, reconciling the outcome into the
/// [`StateController`].
///
/// Each call to [`handle_selection`](Self::handle_selection) is one
/// asynchronous run with a suspension point at the inference call; the
/// host executor multiplexes runs. Overlapping runs are not
/// coordinated: a later run's transitions simply overwrite the
/// controller when they land (last-writer-wins). Hosts wanting strict
/// per-request isolation should serialize calls or discard stale
/// completions with their own generation counter.
pub struct UploadSession {
    config: PipelineConfig,
    provider: Rc<dyn ClassifierProvider>,
    controller: StateController,
    arena: TensorArena,
}

impl UploadSession {
    /// Create a session with the default pipeline configuration.
    #[must_use]
    pub fn new(provider: Rc<dyn ClassifierProvider>, controller: StateController) -> Self {
        Self::with_config(PipelineConfig::default(), provider, controller)
    }

    /// Create a session with an explicit pipeline configuration.
    #[must_use]
    pub fn with_config(
        config: PipelineConfig,
        provider: Rc<dyn ClassifierProvider>,
        controller: StateController,
    ) -> Self {
        Self {
            config,
            provider,
            controller,
            arena: TensorArena::new(),
        }
    }

    /// The current upload state.
    #[must_use]
    pub const fn state(&self) -> UploadState {
        self.controller.state()
    }

    /// The latest score vector, or `None` when no result is held.
    #[must_use]
    pub const fn scores(&self) -> Option<ScoreVector> {
        self.controller.scores()
    }

    /// The buffer gauge shared by all of this session's runs.
    #[must_use]
    pub const fn arena(&self) -> &TensorArena {
        &self.arena
    }

    /// Process one file-selection event end to end.
    ///
    /// Runs to either a `Result*` state (scores stored) or back to
    /// `Idle` (scores cleared, error surfaced via the controller's
    /// callback). Errors are terminal for the run and never retried.
    pub async fn handle_selection(&mut self, selection: FileSelection) {
        self.controller.begin();
        match self.run(selection).await {
            Ok(scores) => {
                info!(
                    fake = scores.fake(),
                    real = scores.real(),
                    verdict = ?scores.verdict(),
                    "classification complete"
                );
                self.controller.complete(scores);
            }
            Err(error) => {
                warn!(%error, "upload run failed");
                self.controller.fail(&error);
            }
        }
    }

    /// The fallible pipeline body, in strict stage order.
    async fn run(&self, selection: FileSelection) -> Result<ScoreVector, UploadError> {
        let file = select::validate(selection)?;
        debug!(name = %file.name, bytes = file.bytes.len(), "file validated");

        let asset = downscale(&file.bytes, &self.config)?;
        debug!(
            width = asset.width(),
            height = asset.height(),
            "downscaled to canonical asset"
        );

        let input = preprocess(&asset, &self.config, &self.arena)?;
        debug!(shape = ?input.shape(), "input tensor ready");

        InferenceEngine::new(self.provider.as_ref()).infer(input).await
    }
}
