//! HTTP places lookups.
//!
//! [`HttpPlacesProvider`] implements [`saferoute_core::PlacesProvider`] over
//! the Google Places Nearby Search API. One request is issued per
//! `(point, category)` pair; requests are throttled by a shared rate limiter
//! and bounded by a per-request timeout.

mod google;
mod provider;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpPlacesProvider, HttpPlacesProviderConfig,
    ProviderBuildError,
};
