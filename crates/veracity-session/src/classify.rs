//! The classifier seam.
//!
//! The classifier is a capability supplied by the host: this core
//! never loads, replaces, or disposes of a model. It only reads the
//! handle at inference time, which keeps the whole pipeline testable
//! with in-memory fakes.

use std::rc::Rc;

use async_trait::async_trait;
use ndarray::Array2;
use veracity_pipeline::BatchedTensor;

/// A loaded, inference-capable binary image classifier.
///
/// # Output contract
///
/// One forward pass over a `1 × H × W × 3` float tensor yields a
/// `1 × 2` score matrix: column 0 is the "fake" score, column 1 the
/// "real" score. The forward pass itself is infallible; availability
/// is modeled at the [`ClassifierProvider`] level instead.
#[async_trait(?Send)]
pub trait Classifier {
    /// Run a single forward pass.
    async fn predict(&self, input: &BatchedTensor) -> Array2<f32>;
}

/// Supplies the current classifier handle, if one is loaded.
///
/// The handle is process-wide, lazily initialized elsewhere, and
/// read-only shared across runs. `None` means "not yet ready" — either
/// loading is still in progress or it failed; this core does not
/// distinguish the two.
pub trait ClassifierProvider {
    /// The current classifier handle, or `None` if unavailable.
    fn classifier(&self) -> Option<Rc<dyn Classifier>>;
}
