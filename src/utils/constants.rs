// src/utils/constants.rs

/// Minimum fused confidence for a candidate link to be accepted.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Weight of the name-similarity signal in the fused score. Strictly greater
/// than the location weight: a perfect name with no location signal must
/// outrank a perfect location with no name signal.
pub const NAME_WEIGHT: f64 = 0.6;

/// Weight of the location-proximity signal in the fused score. The two
/// weights sum to 1.0 so a perfect pair scores exactly 1.0.
pub const LOCATION_WEIGHT: f64 = 0.4;

/// Mean Earth radius in kilometers for the spherical haversine approximation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// e-folding distance of the proximity decay curve. At 10 km the curve is
/// gentle enough that a few hundred meters of GPS noise between two catalogs'
/// coordinates for the same place still scores above 0.9, while places a few
/// tens of kilometers apart score near zero.
pub const DISTANCE_DECAY_KM: f64 = 10.0;
