//! veracity-session: Upload orchestration for the veracity pipeline.
//!
//! Composes the sans-IO `veracity-pipeline` crate with everything one
//! upload run needs around it: file-selection validation, the
//! classifier capability seam, the inference engine, and the state
//! machine that reconciles asynchronous, fallible stages into a small
//! observable status.

pub mod classify;
pub mod engine;
pub mod error;
pub mod select;
pub mod session;
pub mod state;

pub use classify::{Classifier, ClassifierProvider};
pub use engine::InferenceEngine;
pub use error::UploadError;
pub use select::{ACCEPTED_MIME_TYPES, FileSelection, SelectedFile};
pub use session::UploadSession;
pub use state::{StateController, UploadState};
