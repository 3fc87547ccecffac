//! In-memory collaborators for unit, behaviour and doc tests.
//!
//! These stubs avoid network and file access. They are public so that the
//! data, scorer and CLI crates can reuse them in their own tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    BrightnessRaster, Coordinate, FEATURE_COUNT, FeatureRow, PlaceCandidate, PlacesError,
    PlacesProvider, Regressor,
};

/// `PlacesProvider` returning canned responses per category.
///
/// Categories without a canned response yield an empty list.
#[derive(Debug, Default)]
pub struct StubPlacesProvider {
    responses: HashMap<String, Vec<PlaceCandidate>>,
    failures: HashMap<String, PlacesError>,
    calls: AtomicUsize,
    last_radius: Mutex<Option<f64>>,
}

impl StubPlacesProvider {
    /// Create a provider with no canned responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `results` for every lookup of `category`.
    #[must_use]
    pub fn with_results(mut self, category: &str, results: Vec<PlaceCandidate>) -> Self {
        self.responses.insert(category.to_owned(), results);
        self
    }

    /// Fail every lookup of `category` with `error`.
    #[must_use]
    pub fn with_failure(mut self, category: &str, error: PlacesError) -> Self {
        self.failures.insert(category.to_owned(), error);
        self
    }

    /// Number of lookups served so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Radius passed to the most recent lookup.
    #[must_use]
    pub fn last_radius(&self) -> Option<f64> {
        self.last_radius.lock().ok().and_then(|radius| *radius)
    }
}

impl PlacesProvider for StubPlacesProvider {
    fn nearby(
        &self,
        _point: Coordinate,
        radius_m: f64,
        category: &str,
    ) -> Result<Vec<PlaceCandidate>, PlacesError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_radius.lock() {
            *last = Some(radius_m);
        }
        if let Some(error) = self.failures.get(category) {
            return Err(error.clone());
        }
        Ok(self.responses.get(category).cloned().unwrap_or_default())
    }
}

/// `BrightnessRaster` that replays readings in order, then reports missing.
#[derive(Debug, Default)]
pub struct SequenceRaster {
    readings: Mutex<VecDeque<Option<f64>>>,
}

impl SequenceRaster {
    /// Queue `readings` for successive lookups.
    #[must_use]
    pub fn new<I>(readings: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self {
            readings: Mutex::new(readings.into_iter().collect()),
        }
    }
}

impl BrightnessRaster for SequenceRaster {
    fn brightness(&self, _point: Coordinate) -> Option<f64> {
        self.readings.lock().ok()?.pop_front().flatten()
    }
}

/// `BrightnessRaster` returning the same reading everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantRaster(pub f64);

impl BrightnessRaster for ConstantRaster {
    fn brightness(&self, _point: Coordinate) -> Option<f64> {
        Some(self.0)
    }
}

/// `Regressor` computing `bias + sum(weights[i] * row[i])`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedSumRegressor {
    weights: [f64; FEATURE_COUNT],
    bias: f64,
}

impl WeightedSumRegressor {
    /// Create a regressor with the given weights and intercept.
    #[must_use]
    pub const fn new(weights: [f64; FEATURE_COUNT], bias: f64) -> Self {
        Self { weights, bias }
    }
}

impl Regressor for WeightedSumRegressor {
    fn predict(&self, row: &FeatureRow) -> f64 {
        self.weights
            .iter()
            .zip(row)
            .fold(self.bias, |total, (weight, value)| total + weight * value)
    }
}
