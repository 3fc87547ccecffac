//! Core domain types and the feature-extraction pipeline for Saferoute.
//!
//! A route is reduced to a sparse set of sample points, each sample is
//! checked against a places collaborator and a nighttime-lights raster, and
//! the resulting tallies are folded into a single safety score. External
//! services are consumed through the [`PlacesProvider`], [`BrightnessRaster`],
//! [`FeatureTransform`] and [`Regressor`] traits so they can be replaced with
//! stubs in tests.
//!
//! Constructors that accept raw input return `Result` to surface invalid
//! coordinates early.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod analysis;
#[cfg(feature = "serde")]
pub mod api;
pub mod category;
pub mod coordinate;
pub mod extract;
pub mod features;
pub mod places;
pub mod poi;
pub mod raster;
pub mod route;
pub mod sampler;
pub mod scorer;
#[doc(hidden)]
pub mod test_support;

pub use analysis::{AnalysisConfig, AnalysisConfigError, RouteAnalysis, RouteAnalyzer};
#[cfg(feature = "serde")]
pub use api::{
    AnalyzeRequest, AnalyzeResponse, PoiCoord, RankRequest, RankResponse, RouteCandidate,
    ScoredCandidate,
};
pub use category::{CategoryTable, PoiCategory, Polarity};
pub use coordinate::{Coordinate, CoordinateError};
pub use extract::lighting::{
    LightingExtractor, LightingPolicy, ReadingFilter, Statistic, aggregate_readings,
};
pub use extract::poi::{DEFAULT_RADIUS_M, PoiExtractor, PoiFeatures};
pub use features::{FeatureVector, Saturation, ScoreVector};
pub use places::{PlaceCandidate, PlacesError, PlacesProvider};
pub use poi::PoiRecord;
pub use raster::BrightnessRaster;
pub use route::Route;
pub use sampler::{DEFAULT_STRIDE, sample};
pub use scorer::model::{
    FEATURE_COUNT, FeatureRow, FeatureTransform, IdentityTransform, ModelScorer, RankedRoute,
    Regressor,
};
pub use scorer::rule::{RuleBasedScorer, RuleWeights};
pub use scorer::{SafetyBand, sanitise};
