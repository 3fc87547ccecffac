//! JSON payloads for the analyse and rank operations.
//!
//! Requests deserialise strictly: a missing `coords` field, a non-numeric
//! coordinate or an out-of-range latitude is a deserialisation error rather
//! than a silent default.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    BrightnessRaster, Coordinate, FeatureTransform, ModelScorer, PlacesProvider, PoiRecord,
    Polarity, Regressor, Route, RouteAnalysis, RouteAnalyzer, ScoreVector,
};

/// Body of an analyse request: `{"coords": [[lat, lon], ...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzeRequest {
    /// Route points in path order.
    pub coords: Vec<Coordinate>,
}

impl AnalyzeRequest {
    /// Route described by the request.
    #[must_use]
    pub fn route(&self) -> Route {
        Route::new(self.coords.clone())
    }

    /// Run `analyzer` over the requested route.
    #[must_use]
    pub fn analyze<P, R>(&self, analyzer: &RouteAnalyzer<P, R>) -> AnalyzeResponse
    where
        P: PlacesProvider,
        R: BrightnessRaster,
    {
        AnalyzeResponse::from(analyzer.analyze(&self.route()))
    }
}

/// A located place in an analyse response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiCoord {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Category the place was found under.
    #[serde(rename = "type")]
    pub category: String,
    /// Polarity of that category.
    pub signal: Polarity,
}

impl From<&PoiRecord> for PoiCoord {
    fn from(record: &PoiRecord) -> Self {
        Self {
            lat: record.location.lat(),
            lon: record.location.lon(),
            category: record.category.clone(),
            signal: record.polarity,
        }
    }
}

/// Body of an analyse response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Distinct positive places.
    pub positive_poi_count: u32,
    /// Distinct negative places.
    pub negative_poi_count: u32,
    /// Normalised lighting score.
    pub lighting_score: f64,
    /// Every distinct place found.
    pub poi_coords: Vec<PoiCoord>,
    /// Haversine route length.
    pub route_length_km: f64,
    /// Rule-based safety score.
    pub safety_score: f64,
}

impl From<RouteAnalysis> for AnalyzeResponse {
    fn from(analysis: RouteAnalysis) -> Self {
        Self {
            positive_poi_count: analysis.features.positive_count,
            negative_poi_count: analysis.features.negative_count,
            lighting_score: analysis.features.lighting_score,
            poi_coords: analysis.records.iter().map(PoiCoord::from).collect(),
            route_length_km: analysis.length_km,
            safety_score: analysis.safety_score,
        }
    }
}

/// One candidate route in a rank request.
///
/// Fields other than the three scores are carried through to the response
/// untouched, except any incoming `safety_score`, which is replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCandidate {
    /// Normalised model input.
    #[serde(flatten)]
    pub scores: ScoreVector,
    /// Caller-supplied fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a rank request: `{"routes": [{"pos_score", "neg_score", "light_score"}, ...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankRequest {
    /// Candidates to score.
    pub routes: Vec<RouteCandidate>,
}

impl RankRequest {
    /// Score every candidate and sort by descending safety score.
    #[must_use]
    pub fn rank<T, R>(self, scorer: &ModelScorer<T, R>) -> RankResponse
    where
        T: FeatureTransform,
        R: Regressor,
    {
        let batch: Vec<ScoreVector> = self.routes.iter().map(|route| route.scores).collect();
        let ranked = scorer.rank(&batch);
        let mut slots: Vec<Option<RouteCandidate>> = self.routes.into_iter().map(Some).collect();
        let routes = ranked
            .into_iter()
            .filter_map(|entry| {
                let mut route = slots.get_mut(entry.index)?.take()?;
                route.extra.remove("safety_score");
                Some(ScoredCandidate {
                    route,
                    safety_score: entry.safety_score,
                })
            })
            .collect();
        RankResponse { routes }
    }
}

/// A candidate with its model score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// The candidate as submitted.
    #[serde(flatten)]
    pub route: RouteCandidate,
    /// Clamped model score.
    pub safety_score: f64,
}

/// Body of a rank response, sorted by descending `safety_score`.
///
/// Serialises as a bare JSON array so callers can match entries back to
/// their own fields such as `index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankResponse {
    /// Scored candidates.
    pub routes: Vec<ScoredCandidate>,
}
