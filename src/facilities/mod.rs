//! Facility lookup: geocoding, nearby search, and distance ranking.
//!
//! The maps provider sits behind two narrow capability traits so the pure
//! ranking logic stays decoupled from network variability.

pub mod google;
pub mod ranking;

use thiserror::Error;

use crate::geo::Coordinate;
use crate::models::{FacilityCandidate, FacilityCategory};

#[derive(Error, Debug)]
pub enum FacilityError {
    /// The address could not be resolved to a coordinate.
    #[error("geocoding failed: {0}")]
    Geocoding(String),

    /// Nearby search transport or provider failure.
    #[error("facility search failed: {0}")]
    Search(String),
}

/// A resolved address: coordinate plus the provider's normalized form.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedAddress {
    pub coordinate: Coordinate,
    pub formatted_address: String,
}

/// Capability seam: free-form address → coordinate.
pub trait Geocoder {
    fn geocode(&self, address: &str) -> Result<GeocodedAddress, FacilityError>;
}

/// Capability seam: coordinate + category + radius → raw candidates,
/// in arbitrary provider order.
pub trait NearbySearch {
    fn nearby_search(
        &self,
        origin: Coordinate,
        category: FacilityCategory,
        radius_m: u32,
    ) -> Result<Vec<FacilityCandidate>, FacilityError>;
}
