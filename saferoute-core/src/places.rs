//! Look up places near a point.
//!
//! The `PlacesProvider` trait abstracts the third-party places service.
//! Callers supply a centre point, a search radius in metres and a category
//! label, and receive the candidates the service located.
//!
//! Implementations decide how requests are throttled. The extractor treats
//! each call independently, so a failed lookup only loses that one
//! `(point, category)` pair.

use std::sync::Arc;

use thiserror::Error;

use crate::Coordinate;

/// A place returned by the places service before categorisation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCandidate {
    /// Opaque identifier, unique per real-world place.
    pub id: String,
    /// Reported location of the place.
    pub location: Coordinate,
}

impl PlaceCandidate {
    /// Construct a candidate.
    #[must_use]
    pub fn new(id: impl Into<String>, location: Coordinate) -> Self {
        Self {
            id: id.into(),
            location,
        }
    }
}

/// Errors from [`PlacesProvider::nearby`].
///
/// Endpoint strings never include credentials.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacesError {
    /// The request exceeded its deadline.
    #[error("places request to {endpoint} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint that was queried.
        endpoint: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("places request to {endpoint} failed with HTTP {status}: {message}")]
    HttpError {
        /// Endpoint that was queried.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },
    /// The request could not be sent or the connection failed.
    #[error("places request to {endpoint} failed: {message}")]
    NetworkError {
        /// Endpoint that was queried.
        endpoint: String,
        /// Error detail.
        message: String,
    },
    /// The service reported an application-level failure.
    #[error("places service returned {status}: {message}")]
    ServiceError {
        /// Status string reported by the service.
        status: String,
        /// Error detail, possibly empty.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse places response: {message}")]
    ParseError {
        /// Decoder error detail.
        message: String,
    },
}

/// Fetch places of a category within a radius of a point.
///
/// Implementations must return an empty list, not an error, when the service
/// has no results. They must be `Send + Sync` so a single provider can serve
/// concurrent analyses.
///
/// # Examples
///
/// ```rust
/// use saferoute_core::{Coordinate, PlaceCandidate, PlacesError, PlacesProvider};
///
/// struct EmptyProvider;
///
/// impl PlacesProvider for EmptyProvider {
///     fn nearby(
///         &self,
///         _point: Coordinate,
///         _radius_m: f64,
///         _category: &str,
///     ) -> Result<Vec<PlaceCandidate>, PlacesError> {
///         Ok(Vec::new())
///     }
/// }
///
/// let point = Coordinate::new(0.0, 0.0).expect("valid coordinate");
/// assert!(EmptyProvider.nearby(point, 150.0, "police")?.is_empty());
/// # Ok::<(), PlacesError>(())
/// ```
pub trait PlacesProvider: Send + Sync {
    /// Return places of `category` within `radius_m` metres of `point`.
    fn nearby(
        &self,
        point: Coordinate,
        radius_m: f64,
        category: &str,
    ) -> Result<Vec<PlaceCandidate>, PlacesError>;
}

impl<T: PlacesProvider + ?Sized> PlacesProvider for Box<T> {
    fn nearby(
        &self,
        point: Coordinate,
        radius_m: f64,
        category: &str,
    ) -> Result<Vec<PlaceCandidate>, PlacesError> {
        (**self).nearby(point, radius_m, category)
    }
}

impl<T: PlacesProvider + ?Sized> PlacesProvider for Arc<T> {
    fn nearby(
        &self,
        point: Coordinate,
        radius_m: f64,
        category: &str,
    ) -> Result<Vec<PlaceCandidate>, PlacesError> {
        (**self).nearby(point, radius_m, category)
    }
}
