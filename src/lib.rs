//! Facade crate for the Saferoute route safety engine.
//!
//! This crate re-exports the core domain types and exposes the concrete
//! places and lights collaborators and the offline model pipeline behind
//! feature flags.

#![forbid(unsafe_code)]

pub use saferoute_core::{
    AnalysisConfig, AnalysisConfigError, BrightnessRaster, CategoryTable, Coordinate,
    CoordinateError, FeatureVector, ModelScorer, PlaceCandidate, PlacesError, PlacesProvider,
    PoiRecord, Polarity, RankedRoute, Route, RouteAnalysis, RouteAnalyzer, RuleBasedScorer,
    SafetyBand, ScoreVector,
};

#[cfg(feature = "serde")]
pub use saferoute_core::{AnalyzeRequest, AnalyzeResponse, RankRequest, RankResponse};

#[cfg(feature = "data")]
pub use saferoute_data::lights::{LightsGrid, SharedLightsRaster};
#[cfg(feature = "data")]
pub use saferoute_data::places::{HttpPlacesProvider, HttpPlacesProviderConfig};

#[cfg(feature = "model")]
pub use saferoute_scorer::{SafetyScorer, TrainedModel, read_model, train, write_model};
