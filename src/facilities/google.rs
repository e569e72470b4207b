//! Google Maps collaborators: Geocoding and Places Nearby Search.
//!
//! Both APIs wrap their real outcome in a body-level `status` field, so a
//! 200 response still needs status checking. `ZERO_RESULTS` on nearby
//! search is an empty list, not an error.

use serde::Deserialize;

use super::{FacilityError, GeocodedAddress, Geocoder, NearbySearch};
use crate::geo::Coordinate;
use crate::models::{FacilityCandidate, FacilityCategory};

const DEFAULT_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const DEFAULT_PLACES_URL: &str =
    "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Places `type` and `keyword` parameters for a facility category.
fn places_query(category: FacilityCategory) -> (&'static str, &'static str) {
    match category {
        FacilityCategory::Er => ("hospital", "emergency room"),
        FacilityCategory::UrgentCare => ("hospital", "urgent care"),
        FacilityCategory::Clinic => ("doctor", "clinic"),
        FacilityCategory::Pharmacy => ("pharmacy", "pharmacy"),
    }
}

/// HTTP client for both Google Maps endpoints.
///
/// Cheap to clone: the underlying `reqwest` client shares its connection
/// pool across clones, so the geocoding and search seams can reuse one.
#[derive(Clone)]
pub struct GoogleMapsClient {
    geocode_url: String,
    places_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl GoogleMapsClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_config(DEFAULT_GEOCODE_URL, DEFAULT_PLACES_URL, api_key)
    }

    /// Explicit endpoints; used by tests to point at a local stub.
    pub fn with_config(geocode_url: &str, places_url: &str, api_key: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            geocode_url: geocode_url.to_string(),
            places_url: places_url.to_string(),
            api_key: api_key.to_string(),
            client,
        }
    }
}

// ── Wire types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
    formatted_address: Option<String>,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct Place {
    name: Option<String>,
    geometry: Geometry,
    vicinity: Option<String>,
    formatted_address: Option<String>,
    rating: Option<f64>,
}

#[derive(Deserialize)]
struct PlacesResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<Place>,
}

impl Geocoder for GoogleMapsClient {
    fn geocode(&self, address: &str) -> Result<GeocodedAddress, FacilityError> {
        let response = self
            .client
            .get(&self.geocode_url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .map_err(|e| FacilityError::Geocoding(transport_message(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FacilityError::Geocoding(format!(
                "HTTP status {status} from geocoding API"
            )));
        }

        let body: GeocodeResponse = response
            .json()
            .map_err(|e| FacilityError::Geocoding(format!("unreadable response: {e}")))?;

        if body.status != "OK" {
            let msg = body.error_message.unwrap_or(body.status);
            return Err(FacilityError::Geocoding(msg));
        }

        let first = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| FacilityError::Geocoding("no results for address".into()))?;

        Ok(GeocodedAddress {
            coordinate: Coordinate::new(first.geometry.location.lat, first.geometry.location.lng),
            formatted_address: first.formatted_address.unwrap_or_else(|| address.to_string()),
        })
    }
}

impl NearbySearch for GoogleMapsClient {
    fn nearby_search(
        &self,
        origin: Coordinate,
        category: FacilityCategory,
        radius_m: u32,
    ) -> Result<Vec<FacilityCandidate>, FacilityError> {
        let (place_type, keyword) = places_query(category);
        let location = format!("{},{}", origin.lat, origin.lon);
        let radius = radius_m.to_string();

        let response = self
            .client
            .get(&self.places_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("type", place_type),
                ("keyword", keyword),
            ])
            .send()
            .map_err(|e| FacilityError::Search(transport_message(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FacilityError::Search(format!(
                "HTTP status {status} from places API"
            )));
        }

        let body: PlacesResponse = response
            .json()
            .map_err(|e| FacilityError::Search(format!("unreadable response: {e}")))?;

        match body.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Ok(vec![]),
            other => {
                let msg = body.error_message.unwrap_or_else(|| other.to_string());
                return Err(FacilityError::Search(msg));
            }
        }

        let candidates = body
            .results
            .into_iter()
            .map(|place| FacilityCandidate {
                name: place.name.unwrap_or_else(|| "Unknown place".to_string()),
                coordinate: Coordinate::new(place.geometry.location.lat, place.geometry.location.lng),
                category,
                // Nearby search usually returns a short `vicinity` address.
                address: place
                    .vicinity
                    .or(place.formatted_address)
                    .unwrap_or_default(),
                rating: place.rating,
            })
            .collect();

        Ok(candidates)
    }
}

fn transport_message(e: &reqwest::Error) -> String {
    if e.is_connect() {
        "cannot reach maps provider".to_string()
    } else if e.is_timeout() {
        "maps provider request timed out".to_string()
    } else {
        e.to_string()
    }
}
