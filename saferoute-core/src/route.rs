//! Ordered coordinate sequences submitted for analysis.

use geo::{Distance, Haversine};

use crate::Coordinate;

const METRES_PER_KILOMETRE: f64 = 1000.0;

/// A path expressed as an ordered sequence of coordinates.
///
/// Routes may be empty. Order only matters for stride sampling and for the
/// haversine length reported by [`Route::length_km`].
///
/// # Examples
///
/// ```
/// use saferoute_core::{Coordinate, Route};
///
/// # fn main() -> Result<(), saferoute_core::CoordinateError> {
/// let route = Route::new(vec![Coordinate::new(0.0, 0.0)?, Coordinate::new(0.0, 0.01)?]);
/// assert_eq!(route.len(), 2);
/// assert!(route.length_km() > 1.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Route {
    points: Vec<Coordinate>,
}

impl Route {
    /// Construct a route from ordered points.
    #[must_use]
    pub const fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Ordered points along the route.
    #[must_use]
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Number of points in the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the route has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of haversine distances between consecutive points, in kilometres.
    ///
    /// Routes with fewer than two points have zero length.
    #[must_use]
    pub fn length_km(&self) -> f64 {
        let metres: f64 = self
            .points
            .windows(2)
            .filter_map(|pair| match pair {
                [from, to] => Some(Haversine.distance(from.to_point(), to.to_point())),
                _ => None,
            })
            .sum();
        metres / METRES_PER_KILOMETRE
    }
}

impl From<Vec<Coordinate>> for Route {
    fn from(points: Vec<Coordinate>) -> Self {
        Self::new(points)
    }
}
