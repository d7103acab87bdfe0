//! The upload state machine.
//!
//! [`StateController`] holds the one externally observable "where are
//! we" signal plus the latest score vector, and reconciles the
//! asynchronous, fallible pipeline stages into a small set of states:
//!
//! - `Idle → ValidatingOrLoading` on a selection event;
//! - `ValidatingOrLoading → Idle` on validation or decode failure;
//! - `ValidatingOrLoading → AwaitingClassifier → Idle` when inference
//!   runs while the classifier is absent;
//! - `ValidatingOrLoading → ResultFake | ResultReal` on success.
//!
//! A `Result*` state is only ever left by the next selection event.
//!
//! The transient `AwaitingClassifier` excursion on the absent-handle
//! failure is deliberate: the UI briefly shows its "loading model"
//! affordance even though the run has already failed. Do not collapse
//! it into a single transition without a product decision.

use serde::{Deserialize, Serialize};
use veracity_pipeline::{ScoreVector, Verdict};

use crate::error::UploadError;

/// The externally observable upload status.
///
/// Exactly one value is current at any time. The system starts `Idle`
/// and every run terminates in `Idle` or a `Result*` value; it never
/// rests in a transient state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadState {
    /// No run in progress and no retained result.
    #[default]
    Idle,
    /// A selection event is being validated or its image processed.
    ValidatingOrLoading,
    /// Inference was attempted while the classifier was absent.
    /// Transient: immediately followed by `Idle` on the same failure.
    AwaitingClassifier,
    /// The last run classified the image as fake.
    ResultFake,
    /// The last run classified the image as real.
    ResultReal,
}

impl UploadState {
    /// Whether this is a per-run terminal result state.
    #[must_use]
    pub const fn is_result(self) -> bool {
        matches!(self, Self::ResultFake | Self::ResultReal)
    }
}

impl From<Verdict> for UploadState {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Fake => Self::ResultFake,
            Verdict::Real => Self::ResultReal,
        }
    }
}

type StateObserver = Box<dyn Fn(UploadState)>;
type ErrorSink = Box<dyn Fn(&str)>;

/// Owner of the upload state and the latest score vector.
///
/// Hosts observe it through two optional callbacks: a state observer
/// fired on every transition (including transient excursions) and an
/// error sink fired at most once per failed run with a human-readable
/// message. Errors always arrive *after* the state reset, so the host
/// never sees an error alongside a stale in-progress or result state.
#[derive(Default)]
pub struct StateController {
    state: UploadState,
    scores: Option<ScoreVector>,
    on_state: Option<StateObserver>,
    on_error: Option<ErrorSink>,
}

impl StateController {
    /// Create a controller in the `Idle` state with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a state observer fired on every transition.
    #[must_use]
    pub fn on_state(mut self, observer: impl Fn(UploadState) + 'static) -> Self {
        self.on_state = Some(Box::new(observer));
        self
    }

    /// Attach an error sink fired with a user-facing message on every
    /// non-silent failure.
    #[must_use]
    pub fn on_error(mut self, sink: impl Fn(&str) + 'static) -> Self {
        self.on_error = Some(Box::new(sink));
        self
    }

    /// The current upload state.
    #[must_use]
    pub const fn state(&self) -> UploadState {
        self.state
    }

    /// The latest score vector, or `None` when no result is held.
    #[must_use]
    pub const fn scores(&self) -> Option<ScoreVector> {
        self.scores
    }

    /// A selection event arrived: enter `ValidatingOrLoading`.
    ///
    /// Valid from `Idle` and from either `Result*` state (a new upload
    /// replaces the previous result).
    pub fn begin(&mut self) {
        self.transition(UploadState::ValidatingOrLoading);
    }

    /// The run produced a score vector: store it and enter the
    /// matching result state.
    pub fn complete(&mut self, scores: ScoreVector) {
        let next = UploadState::from(scores.verdict());
        self.scores = Some(scores);
        self.transition(next);
    }

    /// The run failed: clear the scores, reset to `Idle`, and surface
    /// the error once (unless it is silent).
    ///
    /// A [`UploadError::ModelUnavailable`] failure first passes
    /// through `AwaitingClassifier` — see the module docs.
    pub fn fail(&mut self, error: &UploadError) {
        if matches!(error, UploadError::ModelUnavailable) {
            self.transition(UploadState::AwaitingClassifier);
        }
        self.scores = None;
        self.transition(UploadState::Idle);
        if !error.is_silent() {
            if let Some(sink) = &self.on_error {
                sink(&error.to_string());
            }
        }
    }

    fn transition(&mut self, next: UploadState) {
        self.state = next;
        if let Some(observer) = &self.on_state {
            observer(next);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn recording_controller() -> (
        StateController,
        Rc<RefCell<Vec<UploadState>>>,
        Rc<RefCell<Vec<String>>>,
    ) {
        let states = Rc::new(RefCell::new(Vec::new()));
        let errors = Rc::new(RefCell::new(Vec::new()));
        let states_log = Rc::clone(&states);
        let errors_log = Rc::clone(&errors);
        let controller = StateController::new()
            .on_state(move |s| states_log.borrow_mut().push(s))
            .on_error(move |msg| errors_log.borrow_mut().push(msg.to_string()));
        (controller, states, errors)
    }

    #[test]
    fn starts_idle_with_no_scores() {
        let controller = StateController::new();
        assert_eq!(controller.state(), UploadState::Idle);
        assert!(controller.scores().is_none());
    }

    #[test]
    fn begin_enters_validating() {
        let (mut controller, states, _) = recording_controller();
        controller.begin();
        assert_eq!(controller.state(), UploadState::ValidatingOrLoading);
        assert_eq!(*states.borrow(), vec![UploadState::ValidatingOrLoading]);
    }

    #[test]
    fn complete_with_higher_fake_score_is_result_fake() {
        let (mut controller, _, _) = recording_controller();
        controller.begin();
        controller.complete(ScoreVector::new(0.9, 0.1));
        assert_eq!(controller.state(), UploadState::ResultFake);
        assert_eq!(controller.scores(), Some(ScoreVector::new(0.9, 0.1)));
    }

    #[test]
    fn complete_with_tie_is_result_real() {
        let (mut controller, _, _) = recording_controller();
        controller.begin();
        controller.complete(ScoreVector::new(0.3, 0.3));
        assert_eq!(controller.state(), UploadState::ResultReal);
    }

    #[test]
    fn fail_resets_state_and_clears_scores() {
        let (mut controller, _, errors) = recording_controller();
        controller.begin();
        controller.complete(ScoreVector::new(0.2, 0.8));

        controller.begin();
        controller.fail(&UploadError::UnsupportedFileType {
            content_type: "image/gif".into(),
        });
        assert_eq!(controller.state(), UploadState::Idle);
        assert!(controller.scores().is_none());
        assert_eq!(errors.borrow().len(), 1);
        assert!(errors.borrow()[0].contains("select"));
    }

    #[test]
    fn no_file_selected_resets_silently() {
        let (mut controller, _, errors) = recording_controller();
        controller.begin();
        controller.fail(&UploadError::NoFileSelected);
        assert_eq!(controller.state(), UploadState::Idle);
        assert!(errors.borrow().is_empty());
    }

    #[test]
    fn model_unavailable_passes_through_awaiting_classifier() {
        let (mut controller, states, errors) = recording_controller();
        controller.begin();
        controller.fail(&UploadError::ModelUnavailable);
        assert_eq!(
            *states.borrow(),
            vec![
                UploadState::ValidatingOrLoading,
                UploadState::AwaitingClassifier,
                UploadState::Idle,
            ]
        );
        assert_eq!(errors.borrow().len(), 1);
        assert!(errors.borrow()[0].contains("model"));
    }

    #[test]
    fn error_fires_after_state_reset() {
        let observed = Rc::new(RefCell::new(Vec::new()));
        let state_at_error = Rc::new(RefCell::new(None));
        let observed_clone = Rc::clone(&observed);
        let state_at_error_clone = Rc::clone(&state_at_error);
        let mut controller = StateController::new()
            .on_state(move |s| observed_clone.borrow_mut().push(s))
            .on_error(move |_| {
                *state_at_error_clone.borrow_mut() = observed.borrow().last().copied();
            });
        controller.begin();
        controller.fail(&UploadError::ModelUnavailable);
        // The last transition seen before the error was the Idle reset.
        assert_eq!(*state_at_error.borrow(), Some(UploadState::Idle));
    }

    #[test]
    fn result_state_reenters_validating_on_next_selection() {
        let (mut controller, _, _) = recording_controller();
        controller.begin();
        controller.complete(ScoreVector::new(0.1, 0.9));
        assert!(controller.state().is_result());

        controller.begin();
        assert_eq!(controller.state(), UploadState::ValidatingOrLoading);
        // Previous scores survive until the new run resolves.
        assert!(controller.scores().is_some());
    }

    #[test]
    fn upload_state_serde_round_trip() {
        for state in [
            UploadState::Idle,
            UploadState::ValidatingOrLoading,
            UploadState::AwaitingClassifier,
            UploadState::ResultFake,
            UploadState::ResultReal,
        ] {
            let json = serde_json::to_string(&state).unwrap();
            let deserialized: UploadState = serde_json::from_str(&json).unwrap();
            assert_eq!(state, deserialized);
        }
    }
}
