//! Pure facility ranking: raw candidates → distance-sorted recommendations.

use crate::geo::{haversine_km, navigation_url, round_km, Coordinate};
use crate::models::{FacilityCandidate, RankedFacility};

/// Annotate candidates with distance from `origin` and sort them.
///
/// Candidates with out-of-range or NaN coordinates are dropped, never
/// fatal. Sort key is (distance ascending, name ascending) — a total,
/// deterministic order even for equidistant facilities.
pub fn rank(origin: Coordinate, candidates: Vec<FacilityCandidate>) -> Vec<RankedFacility> {
    let mut ranked: Vec<RankedFacility> = candidates
        .into_iter()
        .filter(|c| {
            let valid = c.coordinate.in_range();
            if !valid {
                tracing::debug!(
                    name = %c.name,
                    lat = c.coordinate.lat,
                    lon = c.coordinate.lon,
                    "dropping facility candidate with invalid coordinate"
                );
            }
            valid
        })
        .map(|c| RankedFacility {
            distance_km: round_km(haversine_km(origin, c.coordinate)),
            maps_url: navigation_url(c.coordinate),
            facility: c,
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.facility.name.cmp(&b.facility.name))
    });

    ranked
}
