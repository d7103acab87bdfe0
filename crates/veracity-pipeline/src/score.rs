//! Classifier score interpretation.

use serde::{Deserialize, Serialize};

/// Verdict derived from a [`ScoreVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The fake score strictly exceeds the real score.
    Fake,
    /// The real score is at least the fake score (ties resolve here).
    Real,
}

/// Raw two-class output of the classifier: `(fake, real)` scores.
///
/// Immutable once produced. The state controller owns the latest
/// vector, replacing it on every completed run and clearing it on
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    fake: f32,
    real: f32,
}

impl ScoreVector {
    /// Create a score vector from `(fake, real)` class scores.
    #[must_use]
    pub const fn new(fake: f32, real: f32) -> Self {
        Self { fake, real }
    }

    /// Likelihood the image is fake.
    #[must_use]
    pub const fn fake(&self) -> f32 {
        self.fake
    }

    /// Likelihood the image is real.
    #[must_use]
    pub const fn real(&self) -> f32 {
        self.real
    }

    /// Classification rule: strictly greater fake score means fake;
    /// everything else, ties included, means real.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        if self.fake > self.real {
            Verdict::Fake
        } else {
            Verdict::Real
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn higher_fake_score_is_fake() {
        assert_eq!(ScoreVector::new(0.9, 0.1).verdict(), Verdict::Fake);
    }

    #[test]
    fn higher_real_score_is_real() {
        assert_eq!(ScoreVector::new(0.1, 0.9).verdict(), Verdict::Real);
    }

    #[test]
    fn tie_resolves_to_real() {
        assert_eq!(ScoreVector::new(0.3, 0.3).verdict(), Verdict::Real);
    }

    #[test]
    fn accessors_return_components() {
        let scores = ScoreVector::new(0.25, 0.75);
        assert!((scores.fake() - 0.25).abs() < f32::EPSILON);
        assert!((scores.real() - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn serde_round_trip() {
        let scores = ScoreVector::new(0.2, 0.8);
        let json = serde_json::to_string(&scores).unwrap();
        let deserialized: ScoreVector = serde_json::from_str(&json).unwrap();
        assert_eq!(scores, deserialized);
    }
}
