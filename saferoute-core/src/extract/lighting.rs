//! Reduce nighttime-lights readings to a normalised lighting score.
//!
//! Readings are filtered, summarised by a [`Statistic`], divided by a
//! reference radiance and clamped into `0.0..=1.0`. The canonical policy is
//! the arithmetic mean over non-negative readings with a reference of `60`.
//! [`LightingPolicy::percentile_variant`] keeps the stricter 75th percentile
//! over positive readings with a reference of `50`.

use log::debug;

use crate::{BrightnessRaster, Coordinate};

const DEFAULT_REFERENCE: f64 = 60.0;
const VARIANT_PERCENTILE: f64 = 75.0;
const VARIANT_REFERENCE: f64 = 50.0;

/// Summary statistic applied to valid readings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum Statistic {
    /// Arithmetic mean.
    Mean,
    /// Percentile with linear interpolation between closest ranks.
    Percentile {
        /// Percentile in `0.0..=100.0`; values outside are clamped.
        percentile: f64,
    },
}

impl Statistic {
    /// Evaluate the statistic. Returns `None` for an empty slice.
    ///
    /// The slice is sorted in place for percentiles.
    #[must_use]
    pub fn evaluate(self, values: &mut [f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        match self {
            Self::Mean => {
                let total: f64 = values.iter().sum();
                Some(total / count_as_f64(values.len()))
            }
            Self::Percentile { percentile } => {
                values.sort_by(f64::total_cmp);
                percentile_of_sorted(values, percentile)
            }
        }
    }
}

fn count_as_f64(count: usize) -> f64 {
    // Sample counts stay far below 2^32.
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}

fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let fraction = if percentile.is_finite() {
        percentile.clamp(0.0, 100.0) / 100.0
    } else {
        1.0
    };
    let rank = fraction * count_as_f64(last);
    let lower_rank = rank.floor();
    let weight = rank - lower_rank;
    let lower_index = usize::try_from(lower_rank as u64).ok()?;
    let lower = *sorted.get(lower_index)?;
    let upper = sorted.get(lower_index + 1).copied().unwrap_or(lower);
    Some(lower + (upper - lower) * weight)
}

/// Which raw readings count as valid.
///
/// Missing, NaN and infinite readings are always rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ReadingFilter {
    /// Keep readings `>= 0`.
    #[default]
    NonNegative,
    /// Keep readings `> 0`.
    PositiveOnly,
}

impl ReadingFilter {
    /// Whether `value` passes the filter.
    #[must_use]
    pub fn accepts(self, value: f64) -> bool {
        value.is_finite()
            && match self {
                Self::NonNegative => value >= 0.0,
                Self::PositiveOnly => value > 0.0,
            }
    }
}

/// Configuration for the lighting extractor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LightingPolicy {
    /// Statistic applied to valid readings.
    pub statistic: Statistic,
    /// Radiance mapped to a score of `1.0`.
    pub reference: f64,
    /// Validity filter applied before aggregation.
    pub filter: ReadingFilter,
}

impl Default for LightingPolicy {
    fn default() -> Self {
        Self {
            statistic: Statistic::Mean,
            reference: DEFAULT_REFERENCE,
            filter: ReadingFilter::NonNegative,
        }
    }
}

impl LightingPolicy {
    /// The 75th-percentile policy normalised by `50` over positive readings.
    #[must_use]
    pub const fn percentile_variant() -> Self {
        Self {
            statistic: Statistic::Percentile {
                percentile: VARIANT_PERCENTILE,
            },
            reference: VARIANT_REFERENCE,
            filter: ReadingFilter::PositiveOnly,
        }
    }

    /// Whether the reference radiance is usable as a divisor.
    #[must_use]
    pub fn has_valid_reference(&self) -> bool {
        self.reference.is_finite() && self.reference > 0.0
    }
}

/// Aggregate raw readings into a score in `0.0..=1.0`.
///
/// Returns `0.0` when no reading survives the filter or when the policy's
/// reference is unusable.
///
/// # Examples
/// ```
/// use saferoute_core::{LightingPolicy, aggregate_readings};
///
/// let readings = [Some(10.0), Some(20.0), Some(30.0), Some(-5.0), Some(f64::NAN), None];
/// let score = aggregate_readings(readings, &LightingPolicy::default());
/// assert!((score - 20.0 / 60.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn aggregate_readings<I>(readings: I, policy: &LightingPolicy) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    if !policy.has_valid_reference() {
        return 0.0;
    }
    let mut valid: Vec<f64> = readings
        .into_iter()
        .flatten()
        .filter(|value| policy.filter.accepts(*value))
        .collect();
    policy
        .statistic
        .evaluate(&mut valid)
        .map_or(0.0, |summary| (summary / policy.reference).clamp(0.0, 1.0))
}

/// Sample a brightness raster at each point and aggregate the readings.
#[derive(Debug)]
pub struct LightingExtractor<R> {
    raster: R,
    policy: LightingPolicy,
}

impl<R: BrightnessRaster> LightingExtractor<R> {
    /// Create an extractor with the given policy.
    #[must_use]
    pub const fn new(raster: R, policy: LightingPolicy) -> Self {
        Self { raster, policy }
    }

    /// Configured aggregation policy.
    #[must_use]
    pub const fn policy(&self) -> &LightingPolicy {
        &self.policy
    }

    /// Return the normalised lighting score for `points`.
    ///
    /// Points without a valid reading are excluded; with no valid readings
    /// the score is `0.0`.
    #[must_use]
    pub fn extract_lighting(&self, points: &[Coordinate]) -> f64 {
        let readings: Vec<Option<f64>> = points
            .iter()
            .map(|point| self.raster.brightness(*point))
            .collect();
        let score = aggregate_readings(readings.iter().copied(), &self.policy);
        debug!(
            "lighting over {} points ({} readings present): score {score:.3}",
            points.len(),
            readings.iter().flatten().count()
        );
        score
    }
}
