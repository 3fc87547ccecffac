//! Run the full pipeline for one route.
//!
//! [`RouteAnalyzer`] samples the route, runs both extractors over the
//! sampled points and scores the result with [`RuleBasedScorer`].

use std::num::NonZeroUsize;

use log::debug;
use thiserror::Error;

use crate::{
    BrightnessRaster, CategoryTable, DEFAULT_RADIUS_M, DEFAULT_STRIDE, FeatureVector,
    LightingExtractor, LightingPolicy, PlacesProvider, PoiExtractor, PoiRecord, Route,
    RuleBasedScorer, RuleWeights, SafetyBand, Saturation, ScoreVector, Statistic, sample,
};

/// Tunable parameters of the analysis pipeline.
///
/// Defaults describe the canonical policy: stride `10`, radius `150 m`,
/// mean lighting over non-negative readings normalised by `60` and the
/// default category table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct AnalysisConfig {
    /// Keep every `stride`-th route point.
    pub stride: NonZeroUsize,
    /// Places search radius in metres.
    pub radius_m: f64,
    /// Lighting aggregation policy.
    pub lighting: LightingPolicy,
    /// Categories queried at each sampled point.
    pub categories: CategoryTable,
    /// Saturation scales for POI densities.
    pub saturation: Saturation,
    /// Rule-based scorer weights.
    pub weights: RuleWeights,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            stride: DEFAULT_STRIDE,
            radius_m: DEFAULT_RADIUS_M,
            lighting: LightingPolicy::default(),
            categories: CategoryTable::default(),
            saturation: Saturation::default(),
            weights: RuleWeights::default(),
        }
    }
}

/// Errors raised by [`AnalysisConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AnalysisConfigError {
    /// The search radius is not a positive finite number.
    #[error("search radius must be positive and finite, got {radius_m}")]
    InvalidRadius {
        /// Offending radius.
        radius_m: f64,
    },
    /// The lighting reference cannot be used as a divisor.
    #[error("lighting reference must be positive and finite, got {reference}")]
    InvalidReference {
        /// Offending reference.
        reference: f64,
    },
    /// The lighting percentile lies outside `0..=100`.
    #[error("lighting percentile must lie in 0..=100, got {percentile}")]
    InvalidPercentile {
        /// Offending percentile.
        percentile: f64,
    },
    /// A saturation scale is not a positive finite number.
    #[error("saturation scales must be positive and finite, got {positive} and {negative}")]
    InvalidSaturation {
        /// Positive scale.
        positive: f64,
        /// Negative scale.
        negative: f64,
    },
    /// A scorer weight is not finite.
    #[error("scorer weights must be finite")]
    NonFiniteWeight,
}

impl AnalysisConfig {
    /// Check that every numeric parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns the first [`AnalysisConfigError`] found.
    pub fn validate(&self) -> Result<(), AnalysisConfigError> {
        if !(self.radius_m.is_finite() && self.radius_m > 0.0) {
            return Err(AnalysisConfigError::InvalidRadius {
                radius_m: self.radius_m,
            });
        }
        if !self.lighting.has_valid_reference() {
            return Err(AnalysisConfigError::InvalidReference {
                reference: self.lighting.reference,
            });
        }
        if let Statistic::Percentile { percentile } = self.lighting.statistic
            && !(0.0..=100.0).contains(&percentile)
        {
            return Err(AnalysisConfigError::InvalidPercentile { percentile });
        }
        let Saturation {
            positive_scale,
            negative_scale,
        } = self.saturation;
        let usable = |scale: f64| scale.is_finite() && scale > 0.0;
        if !(usable(positive_scale) && usable(negative_scale)) {
            return Err(AnalysisConfigError::InvalidSaturation {
                positive: positive_scale,
                negative: negative_scale,
            });
        }
        let RuleWeights {
            positive,
            lighting,
            negative,
        } = self.weights;
        if ![positive, lighting, negative].iter().all(|w| w.is_finite()) {
            return Err(AnalysisConfigError::NonFiniteWeight);
        }
        Ok(())
    }
}

/// Everything computed for one route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteAnalysis {
    /// POI tallies and lighting score.
    pub features: FeatureVector,
    /// Distinct places found along the route.
    pub records: Vec<PoiRecord>,
    /// Number of points that survived sampling.
    pub sampled_points: usize,
    /// Haversine length of the full route in kilometres.
    pub length_km: f64,
    /// Normalised model input.
    pub scores: ScoreVector,
    /// Rule-based safety score in `0.0..=1.0`.
    pub safety_score: f64,
}

impl RouteAnalysis {
    /// Coarse interpretation of [`RouteAnalysis::safety_score`].
    #[must_use]
    pub fn band(&self) -> SafetyBand {
        SafetyBand::classify(self.safety_score)
    }
}

/// Sampler, both extractors and the rule-based scorer wired together.
///
/// # Examples
/// ```
/// use saferoute_core::test_support::{ConstantRaster, StubPlacesProvider};
/// use saferoute_core::{AnalysisConfig, Coordinate, PlaceCandidate, Route, RouteAnalyzer};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let here = Coordinate::new(12.97, 77.59)?;
/// let provider = StubPlacesProvider::new()
///     .with_results("police", vec![PlaceCandidate::new("p1", here)]);
/// let analyzer = RouteAnalyzer::new(provider, ConstantRaster(30.0), AnalysisConfig::default())?;
///
/// let analysis = analyzer.analyze(&Route::new(vec![here; 10]));
/// assert_eq!(analysis.sampled_points, 1);
/// assert_eq!(analysis.features.positive_count, 1);
/// assert_eq!(analysis.features.lighting_score, 0.5);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RouteAnalyzer<P, R> {
    pois: PoiExtractor<P>,
    lighting: LightingExtractor<R>,
    stride: NonZeroUsize,
    saturation: Saturation,
    scorer: RuleBasedScorer,
}

impl<P: PlacesProvider, R: BrightnessRaster> RouteAnalyzer<P, R> {
    /// Wire collaborators according to `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisConfigError`] when `config` fails validation.
    pub fn new(
        provider: P,
        raster: R,
        config: AnalysisConfig,
    ) -> Result<Self, AnalysisConfigError> {
        config.validate()?;
        let AnalysisConfig {
            stride,
            radius_m,
            lighting,
            categories,
            saturation,
            weights,
        } = config;
        Ok(Self {
            pois: PoiExtractor::new(provider, categories).with_radius(radius_m),
            lighting: LightingExtractor::new(raster, lighting),
            stride,
            saturation,
            scorer: RuleBasedScorer::new(weights, saturation),
        })
    }

    /// Configured sampling stride.
    #[must_use]
    pub const fn stride(&self) -> NonZeroUsize {
        self.stride
    }

    /// Analyse one route.
    ///
    /// Collaborator failures never surface here: failed places lookups and
    /// missing raster readings only reduce the evidence available.
    #[must_use]
    pub fn analyze(&self, route: &Route) -> RouteAnalysis {
        let sampled = sample(route.points(), self.stride);
        let poi_features = self.pois.extract_pois(&sampled);
        let lighting_score = self.lighting.extract_lighting(&sampled);
        let features = FeatureVector {
            positive_count: poi_features.positive_count,
            negative_count: poi_features.negative_count,
            lighting_score,
        };
        let length_km = route.length_km();
        let scores = self.saturation.score_vector(&features, length_km);
        let safety_score = self.scorer.score_vector(&scores);
        debug!(
            "analysed route of {} points ({} sampled, {length_km:.2} km): score {safety_score:.3}",
            route.len(),
            sampled.len()
        );
        RouteAnalysis {
            features,
            records: poi_features.records,
            sampled_points: sampled.len(),
            length_km,
            scores,
            safety_score,
        }
    }
}
