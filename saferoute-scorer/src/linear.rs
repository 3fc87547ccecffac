//! Ridge-regularised linear regression over three features.
#![forbid(unsafe_code)]

use saferoute_core::{FEATURE_COUNT, FeatureRow, Regressor};
use serde::{Deserialize, Serialize};

use crate::{ModelError, TrainingError};

type Matrix = [[f64; FEATURE_COUNT]; FEATURE_COUNT];

/// Determinants below this magnitude are treated as singular.
const SINGULAR_EPSILON: f64 = 1.0e-12;

/// Linear model `intercept + coefficients · row`.
///
/// The intercept is not penalised. Fitting centres the rows and targets,
/// solves `(XᵀX + αI) w = Xᵀy` and recovers the intercept from the means.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RidgeRegressor {
    coefficients: FeatureRow,
    intercept: f64,
}

impl RidgeRegressor {
    /// Build a regressor from explicit parameters.
    ///
    /// # Errors
    /// Returns [`ModelError::NonFiniteParameter`] when any parameter is NaN
    /// or infinite.
    pub fn new(coefficients: FeatureRow, intercept: f64) -> Result<Self, ModelError> {
        let regressor = Self {
            coefficients,
            intercept,
        };
        regressor.validate()?;
        Ok(regressor)
    }

    /// Fit on `rows` against `targets` with penalty `alpha`.
    ///
    /// # Errors
    /// Returns [`TrainingError::EmptyDataset`] for empty input,
    /// [`TrainingError::LengthMismatch`] when the slices differ in length,
    /// [`TrainingError::InvalidParameter`] for a negative or non-finite
    /// `alpha` and [`TrainingError::SingularSystem`] when the normal
    /// equations cannot be solved.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "least squares accumulates float sums over the rows"
    )]
    pub fn fit(rows: &[FeatureRow], targets: &[f64], alpha: f64) -> Result<Self, TrainingError> {
        if rows.is_empty() {
            return Err(TrainingError::EmptyDataset { stage: "regressor" });
        }
        if rows.len() != targets.len() {
            return Err(TrainingError::LengthMismatch {
                rows: rows.len(),
                targets: targets.len(),
            });
        }
        if !(alpha.is_finite() && alpha >= 0.0) {
            return Err(TrainingError::InvalidParameter {
                name: "alpha",
                value: alpha,
            });
        }

        let count = rows.len() as f64;
        let mut row_total = [0.0; FEATURE_COUNT];
        for row in rows {
            accumulate(&mut row_total, row, 1.0);
        }
        let row_mean = row_total.map(|total| total / count);
        let target_mean = targets.iter().sum::<f64>() / count;

        let mut gram = penalty(alpha);
        let mut moment = [0.0; FEATURE_COUNT];
        for (row, target) in rows.iter().zip(targets) {
            let centred = centre(row, &row_mean);
            for (gram_row, value) in gram.iter_mut().zip(centred) {
                accumulate(gram_row, &centred, value);
            }
            accumulate(&mut moment, &centred, target - target_mean);
        }

        let coefficients = solve(gram, moment).ok_or(TrainingError::SingularSystem)?;
        let intercept = target_mean - dot(&coefficients, &row_mean);
        Ok(Self::new(coefficients, intercept)?)
    }

    /// Feature weights.
    #[must_use]
    pub const fn coefficients(&self) -> &FeatureRow {
        &self.coefficients
    }

    /// Constant term.
    #[must_use]
    pub const fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Reject parameters that would produce non-finite predictions.
    ///
    /// # Errors
    /// Returns [`ModelError::NonFiniteParameter`] naming the bad parameter.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.coefficients.iter().all(|value| value.is_finite()) {
            return Err(ModelError::NonFiniteParameter {
                parameter: "regressor coefficients",
            });
        }
        if !self.intercept.is_finite() {
            return Err(ModelError::NonFiniteParameter {
                parameter: "regressor intercept",
            });
        }
        Ok(())
    }
}

impl Regressor for RidgeRegressor {
    #[expect(
        clippy::float_arithmetic,
        reason = "prediction is an affine combination of the features"
    )]
    fn predict(&self, row: &FeatureRow) -> f64 {
        self.intercept + dot(&self.coefficients, row)
    }
}

#[expect(clippy::float_arithmetic, reason = "running weighted sums")]
fn accumulate(total: &mut FeatureRow, row: &FeatureRow, weight: f64) {
    for (sum, value) in total.iter_mut().zip(row) {
        *sum += weight * value;
    }
}

#[expect(clippy::float_arithmetic, reason = "centring subtracts the mean")]
fn centre(row: &FeatureRow, mean: &FeatureRow) -> FeatureRow {
    let mut centred = *row;
    for (value, offset) in centred.iter_mut().zip(mean) {
        *value -= offset;
    }
    centred
}

#[expect(clippy::float_arithmetic, reason = "inner product")]
fn dot(left: &FeatureRow, right: &FeatureRow) -> f64 {
    left.iter().zip(right).map(|(a, b)| a * b).sum()
}

const fn penalty(alpha: f64) -> Matrix {
    [[alpha, 0.0, 0.0], [0.0, alpha, 0.0], [0.0, 0.0, alpha]]
}

#[expect(clippy::float_arithmetic, reason = "cofactor expansion")]
fn determinant(matrix: &Matrix) -> f64 {
    let [[a, b, c], [d, e, f], [g, h, i]] = *matrix;
    a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g)
}

/// Solve `matrix · x = rhs` by Cramer's rule.
#[expect(clippy::float_arithmetic, reason = "ratio of determinants")]
fn solve(matrix: Matrix, rhs: FeatureRow) -> Option<FeatureRow> {
    let det = determinant(&matrix);
    if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
        return None;
    }
    let [[a, b, c], [d, e, f], [g, h, i]] = matrix;
    let [r0, r1, r2] = rhs;
    let x0 = determinant(&[[r0, b, c], [r1, e, f], [r2, h, i]]) / det;
    let x1 = determinant(&[[a, r0, c], [d, r1, f], [g, r2, i]]) / det;
    let x2 = determinant(&[[a, b, r0], [d, e, r1], [g, h, r2]]) / det;
    Some([x0, x1, x2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn assert_close(actual: f64, expected: f64) {
        let delta = (actual - expected).abs();
        assert!(delta < 1.0e-9, "expected {expected}, got {actual}");
    }

    #[rstest]
    fn recovers_exact_linear_relationship() {
        let rows = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [2.0, -1.0, 0.5],
        ];
        let targets: Vec<f64> = rows
            .iter()
            .map(|[x0, x1, x2]| 0.1 + 0.6 * x0 - 0.25 * x1 + 0.5 * x2)
            .collect();

        let model = RidgeRegressor::fit(&rows, &targets, 0.0).expect("fit regressor");

        let [w0, w1, w2] = *model.coefficients();
        assert_close(w0, 0.6);
        assert_close(w1, -0.25);
        assert_close(w2, 0.5);
        assert_close(model.intercept(), 0.1);
        assert_close(model.predict(&[1.0, 2.0, 3.0]), 1.7);
    }

    #[rstest]
    fn penalty_shrinks_coefficients() {
        let rows = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let targets = [0.0, 1.0, 1.0, 1.0];

        let free = RidgeRegressor::fit(&rows, &targets, 0.0).expect("fit regressor");
        let ridge = RidgeRegressor::fit(&rows, &targets, 10.0).expect("fit regressor");

        let [free_w, ..] = *free.coefficients();
        let [ridge_w, ..] = *ridge.coefficients();
        assert!(ridge_w.abs() < free_w.abs());
    }

    #[rstest]
    fn duplicated_columns_without_penalty_are_singular() {
        let rows = [[1.0, 1.0, 0.0], [2.0, 2.0, 0.0], [3.0, 3.0, 1.0]];
        let err = RidgeRegressor::fit(&rows, &[1.0, 2.0, 3.0], 0.0).expect_err("singular");
        assert!(matches!(err, TrainingError::SingularSystem));
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn rejects_invalid_alpha(#[case] alpha: f64) {
        let err = RidgeRegressor::fit(&[[0.0; 3]], &[0.0], alpha).expect_err("invalid alpha");
        assert!(matches!(err, TrainingError::InvalidParameter { name: "alpha", .. }));
    }

    #[rstest]
    fn rejects_mismatched_targets() {
        let err = RidgeRegressor::fit(&[[0.0; 3]], &[], 1.0).expect_err("mismatch");
        assert!(matches!(
            err,
            TrainingError::LengthMismatch {
                rows: 1,
                targets: 0
            }
        ));
    }

    #[rstest]
    fn rejects_non_finite_parameters() {
        let err = RidgeRegressor::new([0.0, f64::INFINITY, 0.0], 0.0).expect_err("infinite");
        assert!(matches!(err, ModelError::NonFiniteParameter { .. }));
    }
}
