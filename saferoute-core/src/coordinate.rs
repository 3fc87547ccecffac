//! Validated WGS84 positions.
//!
//! Payloads carry positions as `[lat, lon]` pairs, which is the reverse of
//! the `x = longitude`, `y = latitude` convention used by `geo`. Conversions
//! into `geo` types swap the axes accordingly.

use geo::{Coord, Point};
use thiserror::Error;

/// A latitude/longitude pair in decimal degrees.
///
/// # Examples
///
/// ```
/// use saferoute_core::Coordinate;
///
/// # fn main() -> Result<(), saferoute_core::CoordinateError> {
/// let point = Coordinate::new(12.97, 77.59)?;
/// assert_eq!(point.lat(), 12.97);
/// assert_eq!(point.lon(), 77.59);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "[f64; 2]", into = "[f64; 2]")
)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

/// Errors returned by [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// One of the components was NaN or infinite.
    #[error("coordinate ({lat}, {lon}) is not finite")]
    NonFinite {
        /// Supplied latitude.
        lat: f64,
        /// Supplied longitude.
        lon: f64,
    },
    /// Latitude fell outside `[-90, 90]`.
    #[error("latitude {lat} is outside [-90, 90]")]
    LatitudeOutOfRange {
        /// Supplied latitude.
        lat: f64,
    },
    /// Longitude fell outside `[-180, 180]`.
    #[error("longitude {lon} is outside [-180, 180]")]
    LongitudeOutOfRange {
        /// Supplied longitude.
        lon: f64,
    },
}

impl Coordinate {
    /// Validate and construct a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] when either component is non-finite or out
    /// of range.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(CoordinateError::NonFinite { lat, lon });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange { lat });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange { lon });
        }
        Ok(Self { lat, lon })
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.lon
    }

    /// Convert to a `geo` point (`x = lon`, `y = lat`).
    #[must_use]
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        Self {
            x: value.lon,
            y: value.lat,
        }
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = CoordinateError;

    fn try_from([lat, lon]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(lat, lon)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(value: Coordinate) -> Self {
        [value.lat, value.lon]
    }
}
