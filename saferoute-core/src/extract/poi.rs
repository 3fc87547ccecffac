//! Tally places of interest along a route.

use std::collections::HashSet;

use log::{debug, warn};

use crate::{CategoryTable, Coordinate, PlacesProvider, PoiRecord, Polarity};

/// Default search radius around each sampled point, in metres.
pub const DEFAULT_RADIUS_M: f64 = 150.0;

/// Per-polarity counts and the located places for one route.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PoiFeatures {
    /// Distinct places found under positive categories.
    pub positive_count: u32,
    /// Distinct places found under negative categories.
    pub negative_count: u32,
    /// Every distinct place, in discovery order.
    pub records: Vec<PoiRecord>,
}

impl PoiFeatures {
    fn record(&mut self, record: PoiRecord) {
        match record.polarity {
            Polarity::Positive => self.positive_count = self.positive_count.saturating_add(1),
            Polarity::Negative => self.negative_count = self.negative_count.saturating_add(1),
        }
        self.records.push(record);
    }
}

/// Query a places provider around sampled points and tally the results.
///
/// One lookup is issued per `(point, category)` pair. A place is counted at
/// most once per call to [`PoiExtractor::extract_pois`], under the first
/// category it was found in. Lookup failures are logged and skipped.
///
/// # Examples
/// ```
/// use saferoute_core::test_support::StubPlacesProvider;
/// use saferoute_core::{CategoryTable, Coordinate, PlaceCandidate, PoiExtractor};
///
/// # fn main() -> Result<(), saferoute_core::CoordinateError> {
/// let here = Coordinate::new(12.97, 77.59)?;
/// let provider = StubPlacesProvider::new()
///     .with_results("police", vec![PlaceCandidate::new("p1", here)]);
/// let extractor = PoiExtractor::new(provider, CategoryTable::default());
///
/// let features = extractor.extract_pois(&[here, here]);
/// assert_eq!(features.positive_count, 1);
/// assert_eq!(features.negative_count, 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PoiExtractor<P> {
    provider: P,
    categories: CategoryTable,
    radius_m: f64,
}

impl<P: PlacesProvider> PoiExtractor<P> {
    /// Create an extractor using [`DEFAULT_RADIUS_M`].
    #[must_use]
    pub fn new(provider: P, categories: CategoryTable) -> Self {
        Self {
            provider,
            categories,
            radius_m: DEFAULT_RADIUS_M,
        }
    }

    /// Override the search radius in metres.
    #[must_use]
    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    /// Search radius in metres.
    #[must_use]
    pub const fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Configured category table.
    #[must_use]
    pub const fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    /// Look up every configured category around each point.
    ///
    /// The set of seen identifiers is local to this call, so repeated calls
    /// with identical provider responses yield identical results.
    #[must_use]
    pub fn extract_pois(&self, points: &[Coordinate]) -> PoiFeatures {
        let mut seen = HashSet::new();
        let mut features = PoiFeatures::default();
        let mut failures = 0_usize;

        for point in points {
            for category in self.categories.iter() {
                let candidates = match self.provider.nearby(*point, self.radius_m, category.name())
                {
                    Ok(candidates) => candidates,
                    Err(err) => {
                        failures += 1;
                        warn!(
                            "places lookup for {} near ({}, {}) failed: {err}",
                            category.name(),
                            point.lat(),
                            point.lon()
                        );
                        continue;
                    }
                };
                for candidate in candidates {
                    if !seen.insert(candidate.id.clone()) {
                        continue;
                    }
                    features.record(PoiRecord {
                        id: candidate.id,
                        location: candidate.location,
                        category: category.name().to_owned(),
                        polarity: category.polarity(),
                    });
                }
            }
        }

        debug!(
            "POI extraction over {} points: {} positive, {} negative, {failures} failed lookups",
            points.len(),
            features.positive_count,
            features.negative_count
        );
        features
    }
}
