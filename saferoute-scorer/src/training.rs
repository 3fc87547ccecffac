//! Fit a scaler and ridge regressor and report held-out accuracy.
#![forbid(unsafe_code)]

use log::debug;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use saferoute_core::{FeatureRow, FeatureTransform, ScoreVector};

use crate::{Dataset, RidgeRegressor, StandardScaler, TrainedModel, TrainingError};

/// Split and regularisation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingConfig {
    /// Share of samples held out for validation, in `0.0..1.0`.
    pub validation_fraction: f64,
    /// Seed for the shuffle preceding the split.
    pub seed: u64,
    /// Ridge penalty applied to the coefficients.
    pub alpha: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            validation_fraction: 0.2,
            seed: 42,
            alpha: 1.0,
        }
    }
}

/// Summary of a training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingReport {
    /// Rows used for fitting.
    pub training_rows: usize,
    /// Rows held out for evaluation.
    pub validation_rows: usize,
    /// Mean absolute error of the served score on the evaluation rows.
    pub mean_absolute_error: f64,
    /// Lowest served score on the evaluation rows.
    pub min_prediction: f64,
    /// Highest served score on the evaluation rows.
    pub max_prediction: f64,
}

/// Shuffle, split, fit and evaluate.
///
/// When the validation share rounds to zero rows the report describes the
/// training rows instead.
///
/// # Errors
/// Returns [`TrainingError::EmptyDataset`] for an empty dataset,
/// [`TrainingError::InvalidParameter`] for a validation fraction outside
/// `0.0..1.0`, and any error raised while fitting.
pub fn train(
    dataset: &Dataset,
    config: &TrainingConfig,
) -> Result<(TrainedModel, TrainingReport), TrainingError> {
    if dataset.is_empty() {
        return Err(TrainingError::EmptyDataset { stage: "training" });
    }
    let validation_rows = validation_count(dataset.len(), config.validation_fraction)?;

    let mut samples: Vec<(FeatureRow, f64)> = dataset
        .rows()
        .iter()
        .copied()
        .zip(dataset.labels().iter().copied())
        .collect();
    samples.shuffle(&mut ChaCha8Rng::seed_from_u64(config.seed));
    let (validation, training) = samples
        .split_at_checked(validation_rows)
        .ok_or(TrainingError::EmptyDataset { stage: "training" })?;

    let (rows, targets): (Vec<FeatureRow>, Vec<f64>) = training.iter().copied().unzip();
    let scaler = StandardScaler::fit(&rows)?;
    let regressor = RidgeRegressor::fit(&scaler.transform_batch(&rows), &targets, config.alpha)?;
    let model = TrainedModel::new(scaler, regressor);

    let evaluation = if validation.is_empty() {
        training
    } else {
        validation
    };
    let report = evaluate(&model, evaluation, training.len(), validation.len());
    debug!(
        "fitted safety model on {} rows; MAE {:.4} over {} rows, predictions {:.3}..={:.3}",
        report.training_rows,
        report.mean_absolute_error,
        evaluation.len(),
        report.min_prediction,
        report.max_prediction
    );
    Ok((model, report))
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the held-out share is a rounded fraction of the row count"
)]
fn validation_count(len: usize, fraction: f64) -> Result<usize, TrainingError> {
    if !(fraction.is_finite() && (0.0..1.0).contains(&fraction)) {
        return Err(TrainingError::InvalidParameter {
            name: "validation_fraction",
            value: fraction,
        });
    }
    let held_out = (len as f64 * fraction).round() as usize;
    Ok(held_out.min(len.saturating_sub(1)))
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "error metrics are float reductions"
)]
fn evaluate(
    model: &TrainedModel,
    samples: &[(FeatureRow, f64)],
    training_rows: usize,
    validation_rows: usize,
) -> TrainingReport {
    let scorer = model.into_scorer();
    let vectors: Vec<ScoreVector> = samples
        .iter()
        .map(|(row, _)| ScoreVector::from(*row))
        .collect();
    let predictions = scorer.score_batch(&vectors);
    let total_error: f64 = predictions
        .iter()
        .zip(samples)
        .map(|(prediction, (_, label))| (prediction - label).abs())
        .sum();
    TrainingReport {
        training_rows,
        validation_rows,
        mean_absolute_error: total_error / samples.len().max(1) as f64,
        min_prediction: predictions.iter().copied().fold(f64::INFINITY, f64::min),
        max_prediction: predictions.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}
