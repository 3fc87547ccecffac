//! Turn route features into safety scores.
//!
//! [`rule::RuleBasedScorer`] applies a fixed formula to a single route.
//! [`model::ModelScorer`] runs a batch of score vectors through a pre-fit
//! transform and regressor and can rank the results. Both modes return
//! scores in `0.0..=1.0`.

use std::fmt;

pub mod model;
pub mod rule;

const SAFE_THRESHOLD: f64 = 0.66;
const MODERATE_THRESHOLD: f64 = 0.33;

/// Clamp a raw score into `0.0..=1.0`, mapping non-finite values to `0.0`.
///
/// # Examples
/// ```
/// use saferoute_core::sanitise;
///
/// assert_eq!(sanitise(1.7), 1.0);
/// assert_eq!(sanitise(-0.2), 0.0);
/// assert_eq!(sanitise(f64::NAN), 0.0);
/// ```
#[must_use]
pub fn sanitise(score: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}

/// Coarse interpretation of a safety score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum SafetyBand {
    /// Score of at least `0.66`.
    Safe,
    /// Score of at least `0.33`.
    Moderate,
    /// Anything lower, including non-finite scores.
    Unsafe,
}

impl SafetyBand {
    /// Classify a score.
    #[must_use]
    pub fn classify(score: f64) -> Self {
        if score >= SAFE_THRESHOLD {
            Self::Safe
        } else if score >= MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Unsafe
        }
    }

    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Moderate => "moderate",
            Self::Unsafe => "unsafe",
        }
    }
}

impl fmt::Display for SafetyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
