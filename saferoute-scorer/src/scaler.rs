//! Per-feature standardisation fitted on training rows.
#![forbid(unsafe_code)]

use saferoute_core::{FEATURE_COUNT, FeatureRow, FeatureTransform};
use serde::{Deserialize, Serialize};

use crate::{ModelError, TrainingError};

/// Centres each feature on its training mean and divides by its population
/// standard deviation.
///
/// Features with zero deviation keep a unit scale so constant columns map to
/// zero instead of NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: FeatureRow,
    scale: FeatureRow,
}

impl StandardScaler {
    /// Build a scaler from explicit parameters.
    ///
    /// # Errors
    /// Returns [`ModelError::NonFiniteParameter`] when a mean or scale is not
    /// finite, or a scale is zero.
    pub fn new(mean: FeatureRow, scale: FeatureRow) -> Result<Self, ModelError> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Fit on `rows`.
    ///
    /// # Errors
    /// Returns [`TrainingError::EmptyDataset`] when `rows` is empty and
    /// [`TrainingError::Model`] when the rows contain non-finite values.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "means and deviations are float reductions over the row count"
    )]
    pub fn fit(rows: &[FeatureRow]) -> Result<Self, TrainingError> {
        if rows.is_empty() {
            return Err(TrainingError::EmptyDataset { stage: "scaler" });
        }
        let count = rows.len() as f64;
        let mut mean = [0.0; FEATURE_COUNT];
        for row in rows {
            for (total, value) in mean.iter_mut().zip(row) {
                *total += value;
            }
        }
        for total in &mut mean {
            *total /= count;
        }

        let mut variance = [0.0; FEATURE_COUNT];
        for row in rows {
            for ((total, value), centre) in variance.iter_mut().zip(row).zip(&mean) {
                *total += (value - centre).powi(2);
            }
        }
        let scale = variance.map(|total| {
            let deviation = (total / count).sqrt();
            if deviation > 0.0 { deviation } else { 1.0 }
        });
        Ok(Self::new(mean, scale)?)
    }

    /// Training means.
    #[must_use]
    pub const fn mean(&self) -> &FeatureRow {
        &self.mean
    }

    /// Training standard deviations, with unit scale for constant features.
    #[must_use]
    pub const fn scale(&self) -> &FeatureRow {
        &self.scale
    }

    /// Reject parameters that would produce non-finite outputs.
    ///
    /// # Errors
    /// Returns [`ModelError::NonFiniteParameter`] naming the bad parameter.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.mean.iter().all(|value| value.is_finite()) {
            return Err(ModelError::NonFiniteParameter {
                parameter: "scaler mean",
            });
        }
        if !self
            .scale
            .iter()
            .all(|value| value.is_finite() && *value != 0.0)
        {
            return Err(ModelError::NonFiniteParameter {
                parameter: "scaler scale",
            });
        }
        Ok(())
    }
}

impl FeatureTransform for StandardScaler {
    #[expect(
        clippy::float_arithmetic,
        reason = "standardisation subtracts the mean and divides by the scale"
    )]
    fn transform(&self, row: &FeatureRow) -> FeatureRow {
        let mut scaled = *row;
        for ((value, centre), scale) in scaled.iter_mut().zip(&self.mean).zip(&self.scale) {
            *value = (*value - centre) / scale;
        }
        scaled
    }
}
