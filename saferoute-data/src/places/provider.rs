//! `PlacesProvider` backed by the Google Places Nearby Search API.
//!
//! The [`PlacesProvider`] trait is synchronous so the analysis pipeline can
//! run in plain threads. This provider bridges to async `reqwest` calls by
//! blocking on a Tokio runtime it owns, and throttles every request through
//! a `governor` rate limiter shared by all callers.
//!
//! # Example
//!
//! ```no_run
//! use saferoute_core::{Coordinate, PlacesProvider};
//! use saferoute_data::places::{HttpPlacesProvider, HttpPlacesProviderConfig};
//! use std::time::Duration;
//!
//! let config = HttpPlacesProviderConfig::new("your-api-key")
//!     .with_timeout(Duration::from_secs(5));
//! let provider = HttpPlacesProvider::with_config(config)?;
//! let here = Coordinate::new(12.9716, 77.5946)?;
//!
//! let police = provider.nearby(here, 150.0, "police")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;
use reqwest::Client;
use saferoute_core::{Coordinate, PlaceCandidate, PlacesError, PlacesProvider};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::google::NearbySearchResponse;

/// Default service root.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

/// Default user agent for places requests.
pub const DEFAULT_USER_AGENT: &str = "saferoute-places/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default sustained request rate.
const DEFAULT_REQUESTS_PER_SECOND: NonZeroU32 = NonZeroU32::MIN.saturating_add(9);

const NEARBY_SEARCH_PATH: &str = "maps/api/place/nearbysearch/json";

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Error type for [`HttpPlacesProvider`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// No API key was configured.
    #[error("a places API key is required")]
    MissingApiKey,
    /// The base URL could not be parsed.
    #[error("invalid places base URL {base_url}: {source}")]
    InvalidBaseUrl {
        /// Configured base URL.
        base_url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Configuration for [`HttpPlacesProvider`].
#[derive(Clone)]
pub struct HttpPlacesProviderConfig {
    /// Service root, e.g. `"https://maps.googleapis.com"`.
    pub base_url: String,
    /// API key appended to each request. Never logged.
    pub api_key: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Sustained request rate across all callers.
    pub requests_per_second: NonZeroU32,
}

impl fmt::Debug for HttpPlacesProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpPlacesProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("requests_per_second", &self.requests_per_second)
            .finish()
    }
}

impl HttpPlacesProviderConfig {
    /// Create a configuration for the public service with `api_key`.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
        }
    }

    /// Point the provider at a different service root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the sustained request rate.
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_second: NonZeroU32) -> Self {
        self.requests_per_second = requests_per_second;
        self
    }
}

/// HTTP places provider for Google Places Nearby Search.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the provider blocks on its own runtime. Inside
/// a multi-threaded runtime it uses the caller's handle with
/// [`tokio::task::block_in_place`]. Inside a `current_thread` runtime it
/// falls back to its own runtime, which blocks the caller's executor for the
/// duration of the request.
///
/// # Errors
///
/// Error values carry the endpoint without its query string, so the API key
/// never appears in messages or logs.
pub struct HttpPlacesProvider {
    client: Client,
    config: HttpPlacesProviderConfig,
    endpoint: Url,
    limiter: DirectRateLimiter,
    runtime: Runtime,
}

impl fmt::Debug for HttpPlacesProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpPlacesProvider")
            .field("config", &self.config)
            .field("endpoint", &self.endpoint.as_str())
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl HttpPlacesProvider {
    /// Create a provider for the public service with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpPlacesProviderConfig::new(api_key))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty, the base URL is invalid, or the
    /// HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpPlacesProviderConfig) -> Result<Self, ProviderBuildError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderBuildError::MissingApiKey);
        }
        let endpoint = nearby_endpoint(&config.base_url)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        let limiter = RateLimiter::direct(Quota::per_second(config.requests_per_second));
        Ok(Self {
            client,
            config,
            endpoint,
            limiter,
            runtime,
        })
    }

    /// Nearby Search endpoint without query parameters.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Build the request URL for one lookup.
    fn request_url(&self, point: Coordinate, radius_m: f64, category: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("location", &format!("{},{}", point.lat(), point.lon()))
            .append_pair("radius", &radius_m.to_string())
            .append_pair("type", category)
            .append_pair("key", &self.config.api_key);
        url
    }

    async fn fetch_async(
        &self,
        point: Coordinate,
        radius_m: f64,
        category: &str,
    ) -> Result<Vec<PlaceCandidate>, PlacesError> {
        self.limiter.until_ready().await;
        let url = self.request_url(point, radius_m, category);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(err))?;

        let body: NearbySearchResponse =
            response
                .json()
                .await
                .map_err(|err| PlacesError::ParseError {
                    message: err.without_url().to_string(),
                })?;

        self.convert_response(body, category)
    }

    /// Convert a reqwest error to a `PlacesError`, dropping the request URL.
    fn convert_reqwest_error(&self, error: reqwest::Error) -> PlacesError {
        let endpoint = self.endpoint.to_string();
        if error.is_timeout() {
            return PlacesError::Timeout {
                endpoint,
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        let error = error.without_url();
        if let Some(status) = error.status() {
            return PlacesError::HttpError {
                endpoint,
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        PlacesError::NetworkError {
            endpoint,
            message: error.to_string(),
        }
    }

    /// Convert a decoded response into place candidates.
    ///
    /// Results without an identifier, without geometry, or with an invalid
    /// location are skipped.
    fn convert_response(
        &self,
        response: NearbySearchResponse,
        category: &str,
    ) -> Result<Vec<PlaceCandidate>, PlacesError> {
        if !response.is_ok() {
            return Err(PlacesError::ServiceError {
                status: response.status,
                message: response.error_message.unwrap_or_default(),
            });
        }

        let total = response.results.len();
        let candidates: Vec<PlaceCandidate> = response
            .results
            .into_iter()
            .filter_map(|place| {
                let id = place.place_id?;
                let location = place.geometry?.location;
                let location = Coordinate::new(location.lat, location.lng).ok()?;
                Some(PlaceCandidate::new(id, location))
            })
            .collect();
        if candidates.len() < total {
            debug!(
                "skipped {} of {total} {category} results without a usable id or location at {}",
                total - candidates.len(),
                self.endpoint
            );
        }
        Ok(candidates)
    }
}

impl PlacesProvider for HttpPlacesProvider {
    /// Query the Nearby Search API around `point`.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime should
    /// be multi-threaded. A `current_thread` caller is served by the
    /// provider's own runtime and is blocked until the request completes.
    fn nearby(
        &self,
        point: Coordinate,
        radius_m: f64,
        category: &str,
    ) -> Result<Vec<PlaceCandidate>, PlacesError> {
        let future = self.fetch_async(point, radius_m, category);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

fn nearby_endpoint(base_url: &str) -> Result<Url, ProviderBuildError> {
    let invalid = |source| ProviderBuildError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        source,
    };
    let mut root = Url::parse(base_url).map_err(invalid)?;
    if !root.path().ends_with('/') {
        let path = format!("{}/", root.path());
        root.set_path(&path);
    }
    root.set_query(None);
    root.join(NEARBY_SEARCH_PATH).map_err(invalid)
}
