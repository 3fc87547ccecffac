//! Feature vectors produced by the extractors and the normalised scores
//! derived from them.

use crate::scorer::sanitise;

const DEFAULT_POSITIVE_SCALE: f64 = 6.0;
const DEFAULT_NEGATIVE_SCALE: f64 = 4.5;

/// Raw per-route features: POI tallies and the lighting score.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureVector {
    /// Distinct places under positive categories.
    pub positive_count: u32,
    /// Distinct places under negative categories.
    pub negative_count: u32,
    /// Normalised lighting score in `0.0..=1.0`.
    pub lighting_score: f64,
}

/// Normalised model input, each component in `0.0..=1.0`.
///
/// This is the shape consumed by the model-based scorer and the ranking
/// payload, and the shape of each row in the synthetic training set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreVector {
    /// Saturated density of positive places.
    pub pos_score: f64,
    /// Saturated density of negative places.
    pub neg_score: f64,
    /// Lighting score.
    pub light_score: f64,
}

impl ScoreVector {
    /// Build a vector from its three components.
    #[must_use]
    pub const fn new(pos_score: f64, neg_score: f64, light_score: f64) -> Self {
        Self {
            pos_score,
            neg_score,
            light_score,
        }
    }

    /// Components in model input order.
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.pos_score, self.neg_score, self.light_score]
    }
}

impl From<[f64; 3]> for ScoreVector {
    fn from([pos_score, neg_score, light_score]: [f64; 3]) -> Self {
        Self::new(pos_score, neg_score, light_score)
    }
}

/// Saturating transforms `1 - exp(-density / k)` for POI densities.
///
/// Density is a count per kilometre of route. A non-positive or non-finite
/// route length contributes zero density.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Saturation {
    /// Scale `k` for positive density.
    pub positive_scale: f64,
    /// Scale `k` for negative density.
    pub negative_scale: f64,
}

impl Default for Saturation {
    fn default() -> Self {
        Self {
            positive_scale: DEFAULT_POSITIVE_SCALE,
            negative_scale: DEFAULT_NEGATIVE_SCALE,
        }
    }
}

impl Saturation {
    /// Convert raw features into a normalised score vector.
    ///
    /// # Examples
    /// ```
    /// use saferoute_core::{FeatureVector, Saturation};
    ///
    /// let features = FeatureVector { positive_count: 0, negative_count: 0, lighting_score: 0.4 };
    /// let scores = Saturation::default().score_vector(&features, 2.0);
    /// assert_eq!(scores.pos_score, 0.0);
    /// assert_eq!(scores.light_score, 0.4);
    /// ```
    #[must_use]
    pub fn score_vector(&self, features: &FeatureVector, length_km: f64) -> ScoreVector {
        ScoreVector {
            pos_score: saturate(
                density(features.positive_count, length_km),
                self.positive_scale,
            ),
            neg_score: saturate(
                density(features.negative_count, length_km),
                self.negative_scale,
            ),
            light_score: sanitise(features.lighting_score),
        }
    }
}

fn density(count: u32, length_km: f64) -> f64 {
    if length_km.is_finite() && length_km > 0.0 {
        f64::from(count) / length_km
    } else {
        0.0
    }
}

fn saturate(density: f64, scale: f64) -> f64 {
    if !(scale.is_finite() && scale > 0.0) {
        return 0.0;
    }
    sanitise(1.0 - (-density / scale).exp())
}
