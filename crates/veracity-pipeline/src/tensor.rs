//! Tracked numeric buffers for the preprocessing stage.
//!
//! The classifier backend treats tensors as GPU-backed buffers that
//! leak unless released. This module reimplements that discipline as
//! ownership-transferring handles: every tensor holds an [`AllocGuard`]
//! registered with a [`TensorArena`], and the guard's `Drop` is the
//! release. A buffer is therefore released exactly once on every exit
//! path — success, decode failure, or inference failure — without any
//! explicit cleanup calls.
//!
//! The arena's live/peak counters also serve as the allocation-tracking
//! instrument the test suite uses to verify that preprocessing never
//! holds more than two buffers at once and leaves none behind.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::{Array3, Array4, ArrayView4, Axis};

use crate::types::CHANNELS;

#[derive(Default)]
struct ArenaInner {
    live: AtomicUsize,
    peak: AtomicUsize,
}

/// Shared gauge over all tensor buffers allocated for one session.
///
/// Cloning is cheap and shares the counters. Create one per session
/// and pass it to every preprocessing call so buffer accounting spans
/// the whole run.
#[derive(Clone, Default)]
pub struct TensorArena {
    inner: Arc<ArenaInner>,
}

impl TensorArena {
    /// Create an arena with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently unreleased buffers.
    #[must_use]
    pub fn live(&self) -> usize {
        self.inner.live.load(Ordering::Relaxed)
    }

    /// Highest number of simultaneously unreleased buffers observed.
    #[must_use]
    pub fn peak(&self) -> usize {
        self.inner.peak.load(Ordering::Relaxed)
    }

    /// Register one new buffer and return its release guard.
    fn track(&self) -> AllocGuard {
        let live = self.inner.live.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner.peak.fetch_max(live, Ordering::Relaxed);
        AllocGuard {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Release token for one tracked buffer. Dropping it is the release.
struct AllocGuard {
    inner: Arc<ArenaInner>,
}

impl Drop for AllocGuard {
    fn drop(&mut self) {
        self.inner.live.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Rank-3 pixel buffer (height × width × channel, `u8`) decoded from
/// an image asset.
///
/// Transient: created and consumed inside the preprocessing stage,
/// never exposed beyond it.
pub struct PixelTensor {
    data: Array3<u8>,
    _guard: AllocGuard,
}

impl PixelTensor {
    /// Decode an RGB image into a tracked pixel buffer.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_image(image: &image::RgbImage, arena: &TensorArena) -> Self {
        let (width, height) = image.dimensions();
        let data = Array3::from_shape_fn((height as usize, width as usize, CHANNELS), |(y, x, c)| {
            image.get_pixel(x as u32, y as u32).0[c]
        });
        Self {
            data,
            _guard: arena.track(),
        }
    }

    /// Buffer dimensions as `(height, width)`.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        let shape = self.data.shape();
        (shape[0], shape[1])
    }

    /// Resize bilinearly to a square `target × target` buffer,
    /// converting to floating point.
    ///
    /// Consumes (and thereby releases) the source pixel buffer once
    /// the resized buffer has been produced, so at most two buffers
    /// from this stage are live at the same time.
    ///
    /// Coordinate mapping is `src = dst * (src_len / dst_len)` with
    /// edge clamping, matching the resampling the classifier was
    /// trained with.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn resize_bilinear(self, target: u32, arena: &TensorArena) -> FloatTensor {
        let (src_h, src_w) = self.dimensions();
        let target = target as usize;
        let scale_y = src_h as f32 / target as f32;
        let scale_x = src_w as f32 / target as f32;

        let data = Array3::from_shape_fn((target, target, CHANNELS), |(y, x, c)| {
            let src_y = y as f32 * scale_y;
            let src_x = x as f32 * scale_x;
            sample_bilinear(&self.data, src_y, src_x, c)
        });

        FloatTensor {
            data,
            _guard: arena.track(),
        }
        // `self` drops here, releasing the pixel buffer.
    }
}

/// Sample one channel of a `u8` HWC buffer at a fractional position.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn sample_bilinear(data: &Array3<u8>, y: f32, x: f32, c: usize) -> f32 {
    let (h, w) = (data.shape()[0], data.shape()[1]);
    let y0 = (y.floor() as usize).min(h - 1);
    let x0 = (x.floor() as usize).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let x1 = (x0 + 1).min(w - 1);
    let fy = y - y0 as f32;
    let fx = x - x0 as f32;

    let top = f32::from(data[(y0, x0, c)]).mul_add(1.0 - fx, f32::from(data[(y0, x1, c)]) * fx);
    let bottom = f32::from(data[(y1, x0, c)]).mul_add(1.0 - fx, f32::from(data[(y1, x1, c)]) * fx);
    top.mul_add(1.0 - fy, bottom * fy)
}

/// Rank-3 `f32` buffer at the model's spatial resolution, not yet
/// batched. The intermediate between resizing and batching.
pub struct FloatTensor {
    data: Array3<f32>,
    _guard: AllocGuard,
}

impl FloatTensor {
    /// Buffer dimensions as `(height, width)`.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        let shape = self.data.shape();
        (shape[0], shape[1])
    }

    /// Add a leading batch axis of size 1, producing the buffer handed
    /// to the classifier.
    ///
    /// The axis insertion reuses the underlying allocation; the
    /// unbatched intermediate is consumed by the move and its release
    /// guard travels with the batched tensor.
    #[must_use]
    pub fn into_batched(self) -> BatchedTensor {
        BatchedTensor {
            data: self.data.insert_axis(Axis(0)),
            _guard: self._guard,
        }
    }
}

/// Rank-4 `f32` buffer (`1 × height × width × channel`) ready for a
/// forward pass.
///
/// Ownership transfers into the inference engine, which is responsible
/// for releasing it (by dropping) after use — on the failure path too.
pub struct BatchedTensor {
    data: Array4<f32>,
    _guard: AllocGuard,
}

impl BatchedTensor {
    /// Read-only view of the batched data.
    #[must_use]
    pub fn view(&self) -> ArrayView4<'_, f32> {
        self.data.view()
    }

    /// Tensor shape as `[batch, height, width, channel]`.
    #[must_use]
    pub fn shape(&self) -> [usize; 4] {
        let s = self.data.shape();
        [s[0], s[1], s[2], s[3]]
    }
}
