//! Closed-form safety score for a single route.

use crate::scorer::sanitise;
use crate::{FeatureVector, Saturation, ScoreVector};

/// Weights of the rule-based formula.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RuleWeights {
    /// Weight of the positive-density term.
    pub positive: f64,
    /// Weight of the lighting term.
    pub lighting: f64,
    /// Weight of the negative-density penalty.
    pub negative: f64,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            positive: 0.6,
            lighting: 0.5,
            negative: 0.25,
        }
    }
}

/// Score routes with
/// `w_pos * pos_score + w_light * light_score - w_neg * neg_score`,
/// clamped to `0.0..=1.0`.
///
/// # Examples
/// ```
/// use saferoute_core::{FeatureVector, RuleBasedScorer};
///
/// let scorer = RuleBasedScorer::default();
/// let dark = FeatureVector { positive_count: 0, negative_count: 6, lighting_score: 0.1 };
/// let bright = FeatureVector { positive_count: 12, negative_count: 0, lighting_score: 0.8 };
/// assert!(scorer.score(&bright, 2.0) > scorer.score(&dark, 2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RuleBasedScorer {
    weights: RuleWeights,
    saturation: Saturation,
}

impl RuleBasedScorer {
    /// Create a scorer with explicit weights and saturation scales.
    #[must_use]
    pub const fn new(weights: RuleWeights, saturation: Saturation) -> Self {
        Self {
            weights,
            saturation,
        }
    }

    /// Configured weights.
    #[must_use]
    pub const fn weights(&self) -> &RuleWeights {
        &self.weights
    }

    /// Configured saturation scales.
    #[must_use]
    pub const fn saturation(&self) -> &Saturation {
        &self.saturation
    }

    /// Score raw features for a route of `length_km` kilometres.
    #[must_use]
    pub fn score(&self, features: &FeatureVector, length_km: f64) -> f64 {
        self.score_vector(&self.saturation.score_vector(features, length_km))
    }

    /// Score an already normalised vector.
    #[must_use]
    pub fn score_vector(&self, scores: &ScoreVector) -> f64 {
        let RuleWeights {
            positive,
            lighting,
            negative,
        } = self.weights;
        sanitise(
            positive * scores.pos_score + lighting * scores.light_score
                - negative * scores.neg_score,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn scorer() -> RuleBasedScorer {
        RuleBasedScorer::default()
    }

    #[rstest]
    fn combines_weighted_terms(scorer: RuleBasedScorer) {
        let score = scorer.score_vector(&ScoreVector::new(0.5, 0.4, 0.6));
        assert!((score - (0.3 + 0.3 - 0.1)).abs() < 1e-12);
    }

    #[rstest]
    fn penalty_cannot_go_below_zero(scorer: RuleBasedScorer) {
        assert_eq!(scorer.score_vector(&ScoreVector::new(0.0, 1.0, 0.0)), 0.0);
    }

    #[rstest]
    fn saturated_route_clamps_to_one() {
        let scorer = RuleBasedScorer::new(
            RuleWeights {
                positive: 1.0,
                lighting: 1.0,
                negative: 0.0,
            },
            Saturation::default(),
        );
        assert_eq!(scorer.score_vector(&ScoreVector::new(1.0, 0.0, 1.0)), 1.0);
    }

    #[rstest]
    fn zero_length_uses_lighting_only(scorer: RuleBasedScorer) {
        let features = FeatureVector {
            positive_count: 9,
            negative_count: 9,
            lighting_score: 0.4,
        };
        assert!((scorer.score(&features, 0.0) - 0.2).abs() < 1e-12);
    }
}
