//! Batch scoring through a pre-fit transform and regressor.

use std::sync::Arc;

use crate::ScoreVector;
use crate::scorer::sanitise;

/// Number of model input features.
pub const FEATURE_COUNT: usize = 3;

/// One model input row: `[pos_score, neg_score, light_score]`.
pub type FeatureRow = [f64; FEATURE_COUNT];

/// Deterministic pre-fit transform applied before prediction, such as
/// standardisation.
pub trait FeatureTransform: Send + Sync {
    /// Transform a single row.
    fn transform(&self, row: &FeatureRow) -> FeatureRow;

    /// Transform every row in order.
    fn transform_batch(&self, rows: &[FeatureRow]) -> Vec<FeatureRow> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}

/// Pre-fit regression function.
///
/// Implementations must be side-effect free and deterministic. Outputs are
/// not required to lie in `0.0..=1.0`; [`ModelScorer`] clamps them.
///
/// # Examples
///
/// ```rust
/// use saferoute_core::{FeatureRow, IdentityTransform, ModelScorer, Regressor, ScoreVector};
///
/// struct LightOnly;
///
/// impl Regressor for LightOnly {
///     fn predict(&self, row: &FeatureRow) -> f64 {
///         row[2]
///     }
/// }
///
/// let scorer = ModelScorer::new(IdentityTransform, LightOnly);
/// let scores = scorer.score_batch(&[ScoreVector::new(0.0, 0.0, 0.7)]);
/// assert_eq!(scores, vec![0.7]);
/// ```
pub trait Regressor: Send + Sync {
    /// Predict a raw score for one transformed row.
    fn predict(&self, row: &FeatureRow) -> f64;

    /// Predict every row in order.
    fn predict_batch(&self, rows: &[FeatureRow]) -> Vec<f64> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}

impl<T: FeatureTransform + ?Sized> FeatureTransform for Box<T> {
    fn transform(&self, row: &FeatureRow) -> FeatureRow {
        (**self).transform(row)
    }
}

impl<T: FeatureTransform + ?Sized> FeatureTransform for Arc<T> {
    fn transform(&self, row: &FeatureRow) -> FeatureRow {
        (**self).transform(row)
    }
}

impl<T: Regressor + ?Sized> Regressor for Box<T> {
    fn predict(&self, row: &FeatureRow) -> f64 {
        (**self).predict(row)
    }
}

impl<T: Regressor + ?Sized> Regressor for Arc<T> {
    fn predict(&self, row: &FeatureRow) -> f64 {
        (**self).predict(row)
    }
}

/// Transform that passes rows through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl FeatureTransform for IdentityTransform {
    fn transform(&self, row: &FeatureRow) -> FeatureRow {
        *row
    }
}

/// A scored input, tagged with its position in the original batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedRoute {
    /// Index of the vector in the batch passed to [`ModelScorer::rank`].
    pub index: usize,
    /// The input vector.
    pub scores: ScoreVector,
    /// Clamped model output.
    pub safety_score: f64,
}

/// Model-based scorer composed of a transform and a regressor.
#[derive(Debug, Clone)]
pub struct ModelScorer<T, R> {
    transform: T,
    regressor: R,
}

impl<T: FeatureTransform, R: Regressor> ModelScorer<T, R> {
    /// Compose a scorer.
    #[must_use]
    pub const fn new(transform: T, regressor: R) -> Self {
        Self {
            transform,
            regressor,
        }
    }

    /// Score one vector.
    #[must_use]
    pub fn score(&self, scores: &ScoreVector) -> f64 {
        sanitise(
            self.regressor
                .predict(&self.transform.transform(&scores.to_array())),
        )
    }

    /// Score a batch, returning one clamped score per input in input order.
    #[must_use]
    pub fn score_batch(&self, batch: &[ScoreVector]) -> Vec<f64> {
        let rows: Vec<FeatureRow> = batch.iter().map(|scores| scores.to_array()).collect();
        let transformed = self.transform.transform_batch(&rows);
        self.regressor
            .predict_batch(&transformed)
            .into_iter()
            .map(sanitise)
            .collect()
    }

    /// Score a batch and sort it by descending safety score.
    ///
    /// The sort is stable, so equal scores keep their input order.
    #[must_use]
    pub fn rank(&self, batch: &[ScoreVector]) -> Vec<RankedRoute> {
        let mut ranked: Vec<RankedRoute> = batch
            .iter()
            .zip(self.score_batch(batch))
            .enumerate()
            .map(|(index, (scores, safety_score))| RankedRoute {
                index,
                scores: *scores,
                safety_score,
            })
            .collect();
        ranked.sort_by(|left, right| right.safety_score.total_cmp(&left.safety_score));
        ranked
    }
}
