//! Response types for the Google Places Nearby Search API.
//!
//! Only the fields needed to locate and identify a place are decoded; the
//! rest of each result is ignored.
//!
//! See: <https://developers.google.com/maps/documentation/places/web-service/search-nearby>

use serde::Deserialize;

/// Nearby Search response envelope.
#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    /// Status code from the service.
    ///
    /// Common values:
    /// - `"OK"` - at least one result was returned
    /// - `"ZERO_RESULTS"` - the search succeeded but matched nothing
    /// - `"OVER_QUERY_LIMIT"` - quota exhausted
    /// - `"REQUEST_DENIED"` - the key was rejected
    /// - `"INVALID_REQUEST"` - a required parameter was missing
    pub status: String,

    /// Detail accompanying a non-success status.
    #[serde(default)]
    pub error_message: Option<String>,

    /// Matched places. Absent on error responses.
    #[serde(default)]
    pub results: Vec<PlaceResult>,
}

impl NearbySearchResponse {
    /// Whether the status denotes a successful search.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self.status.as_str(), "OK" | "ZERO_RESULTS")
    }
}

/// A single place in a Nearby Search response.
#[derive(Debug, Deserialize)]
pub struct PlaceResult {
    /// Stable textual identifier of the place.
    pub place_id: Option<String>,
    /// Location of the place.
    pub geometry: Option<Geometry>,
}

/// Geometry block of a place.
#[derive(Debug, Deserialize)]
pub struct Geometry {
    /// Representative point.
    pub location: LatLng,
}

/// Latitude/longitude pair as reported by the service.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn deserialise_success_response() {
        let json = r#"{
            "status": "OK",
            "html_attributions": [],
            "results": [
                {
                    "place_id": "ChIJ-station",
                    "name": "Central Police Station",
                    "geometry": {"location": {"lat": 12.9716, "lng": 77.5946}},
                    "types": ["police", "point_of_interest"]
                }
            ]
        }"#;

        let response: NearbySearchResponse =
            serde_json::from_str(json).expect("should deserialise");

        assert!(response.is_ok());
        assert_eq!(response.results.len(), 1);
        let place = &response.results[0];
        assert_eq!(place.place_id.as_deref(), Some("ChIJ-station"));
        let location = place.geometry.as_ref().expect("geometry").location;
        assert_eq!(location.lat, 12.9716);
        assert_eq!(location.lng, 77.5946);
    }

    #[rstest]
    fn deserialise_zero_results() {
        let json = r#"{"status": "ZERO_RESULTS", "results": []}"#;
        let response: NearbySearchResponse =
            serde_json::from_str(json).expect("should deserialise");
        assert!(response.is_ok());
        assert!(response.results.is_empty());
    }

    #[rstest]
    fn deserialise_error_response() {
        let json = r#"{
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }"#;

        let response: NearbySearchResponse =
            serde_json::from_str(json).expect("should deserialise");

        assert!(!response.is_ok());
        assert_eq!(
            response.error_message.as_deref(),
            Some("The provided API key is invalid.")
        );
        assert!(response.results.is_empty());
    }

    #[rstest]
    fn tolerates_results_without_geometry() {
        let json = r#"{"status": "OK", "results": [{"place_id": "bare"}, {}]}"#;
        let response: NearbySearchResponse =
            serde_json::from_str(json).expect("should deserialise");
        assert_eq!(response.results.len(), 2);
        assert!(response.results[0].geometry.is_none());
        assert!(response.results[1].place_id.is_none());
    }
}
