//! Seeded synthetic training data labelled by the rule-based scorer.
//!
//! Each sample draws a route length, POI tallies that grow with the length,
//! and a lighting score. The tallies are saturated into a
//! [`ScoreVector`](saferoute_core::ScoreVector) and labelled with
//! [`RuleBasedScorer::score_vector`], so a fitted model approximates the
//! rule-based score.
#![forbid(unsafe_code)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use saferoute_core::{FeatureRow, FeatureVector, RuleBasedScorer};

use crate::TrainingError;

const LENGTH_KM: std::ops::Range<f64> = 1.5..6.0;
const POSITIVE_PER_KM: f64 = 5.8;
const POSITIVE_SPREAD_PER_KM: f64 = 1.0;
const NEGATIVE_PER_KM: f64 = 1.3;
const NEGATIVE_SPREAD_PER_KM: f64 = 0.6;
const LIGHTING_MEAN: f64 = 0.58;
const LIGHTING_SPREAD: f64 = 0.10;
const LIGHTING_MIN: f64 = 0.30;
const LIGHTING_MAX: f64 = 0.75;

/// Size and seed of the synthetic dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticConfig {
    /// Number of samples to draw.
    pub samples: usize,
    /// Seed for the sample generator.
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            samples: 8_000,
            seed: 42,
        }
    }
}

/// Feature rows with one label each.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    rows: Vec<FeatureRow>,
    labels: Vec<f64>,
}

impl Dataset {
    /// Pair rows with labels.
    ///
    /// # Errors
    /// Returns [`TrainingError::LengthMismatch`] when the lengths differ.
    pub fn new(rows: Vec<FeatureRow>, labels: Vec<f64>) -> Result<Self, TrainingError> {
        if rows.len() != labels.len() {
            return Err(TrainingError::LengthMismatch {
                rows: rows.len(),
                targets: labels.len(),
            });
        }
        Ok(Self { rows, labels })
    }

    /// Feature rows in `[pos_score, neg_score, light_score]` order.
    #[must_use]
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// Labels aligned with [`Dataset::rows`].
    #[must_use]
    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Draw `config.samples` labelled samples.
///
/// The same configuration and scorer always produce the same dataset.
///
/// # Errors
/// Returns [`TrainingError::Distribution`] when a sampling distribution
/// cannot be built.
pub fn generate(
    config: &SyntheticConfig,
    scorer: &RuleBasedScorer,
) -> Result<Dataset, TrainingError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let lighting = normal("lighting", LIGHTING_MEAN, LIGHTING_SPREAD)?;
    let mut rows = Vec::with_capacity(config.samples);
    let mut labels = Vec::with_capacity(config.samples);

    for _ in 0..config.samples {
        let length_km = rng.gen_range(LENGTH_KM);
        let features = FeatureVector {
            positive_count: draw_count(
                &mut rng,
                "positive count",
                POSITIVE_PER_KM,
                POSITIVE_SPREAD_PER_KM,
                length_km,
            )?,
            negative_count: draw_count(
                &mut rng,
                "negative count",
                NEGATIVE_PER_KM,
                NEGATIVE_SPREAD_PER_KM,
                length_km,
            )?,
            lighting_score: lighting.sample(&mut rng).clamp(LIGHTING_MIN, LIGHTING_MAX),
        };
        let scores = scorer.saturation().score_vector(&features, length_km);
        labels.push(scorer.score_vector(&scores));
        rows.push(scores.to_array());
    }

    Dataset::new(rows, labels)
}

fn normal(name: &'static str, mean: f64, spread: f64) -> Result<Normal<f64>, TrainingError> {
    Normal::new(mean, spread).map_err(|err| TrainingError::Distribution {
        name,
        message: err.to_string(),
    })
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "counts are truncated draws clamped to the u32 range"
)]
fn draw_count(
    rng: &mut ChaCha8Rng,
    name: &'static str,
    per_km: f64,
    spread_per_km: f64,
    length_km: f64,
) -> Result<u32, TrainingError> {
    let draw = normal(name, per_km * length_km, spread_per_km * length_km)?.sample(rng);
    Ok(draw.trunc().clamp(0.0, f64::from(u32::MAX)) as u32)
}
