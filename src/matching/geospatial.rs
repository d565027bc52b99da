// src/matching/geospatial.rs - Great-circle distance and proximity scoring

use crate::models::core::Coordinates;
use crate::utils::constants::{DISTANCE_DECAY_KM, EARTH_RADIUS_KM};

/// Haversine great-circle distance in kilometers on a spherical Earth.
pub fn haversine_distance_km(p1: &Coordinates, p2: &Coordinates) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let d_lat = (p2.latitude - p1.latitude).to_radians();
    let d_lon = (p2.longitude - p1.longitude).to_radians();
    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Maps coordinate proximity to a [0,1] score via exponential decay.
///
/// Zero distance scores exactly 1.0 and the curve stays above 0.9 for the
/// few-hundred-meter offsets typical between independently sourced
/// coordinates for the same place, while distances beyond a few tens of
/// kilometers score near zero. Either pair absent scores 0.0: missing
/// location is "no signal", not "different place".
pub fn location_similarity(p1: Option<&Coordinates>, p2: Option<&Coordinates>) -> f64 {
    match (p1, p2) {
        (Some(a), Some(b)) => {
            let distance_km = haversine_distance_km(a, b);
            (-distance_km / DISTANCE_DECAY_KM).exp()
        }
        _ => 0.0,
    }
}
