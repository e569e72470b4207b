//! Great-circle math and navigation links.
//!
//! Pure functions only — no I/O, no provider knowledge. Facility ranking
//! and the orchestrator build on these.

use serde::{Deserialize, Serialize};

/// WGS-84 mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A latitude/longitude pair in degrees.
///
/// Deliberately unvalidated: provider responses may carry out-of-range
/// values, which callers filter with [`Coordinate::in_range`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether this is a plausible WGS-84 coordinate.
    ///
    /// Rejects |lat| > 90, |lon| > 180, and NaN (NaN comparisons are false).
    pub fn in_range(&self) -> bool {
        self.lat.abs() <= 90.0 && self.lon.abs() <= 180.0
    }
}

/// Great-circle (Haversine) distance between two coordinates, in kilometers.
///
/// `d = 2R·asin(sqrt(sin²(Δφ/2) + cosφ1·cosφ2·sin²(Δλ/2)))`
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Round a distance to 2 decimal places for display determinism.
pub fn round_km(distance_km: f64) -> f64 {
    (distance_km * 100.0).round() / 100.0
}

/// Deterministic Google Maps deep link for a coordinate pair.
pub fn navigation_url(target: Coordinate) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={},{}",
        target.lat, target.lon
    )
}
