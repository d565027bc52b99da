// src/matching/score.rs - Fusion of lexical and geospatial similarity

use serde::{Deserialize, Serialize};

use crate::utils::constants::{LOCATION_WEIGHT, NAME_WEIGHT};

/// Relative weights of the two similarity signals.
///
/// The name weight is strictly greater than the location weight and the pair
/// sums to 1.0; a record with no location signal still reaches a usable score
/// through its name, just with a lower ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub name: f64,
    pub location: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self { name: NAME_WEIGHT, location: LOCATION_WEIGHT }
    }
}

/// Weighted sum of the two component scores, clamped to [0,1].
pub fn overall_score(name_similarity: f64, location_similarity: f64, weights: &ScoreWeights) -> f64 {
    (name_similarity * weights.name + location_similarity * weights.location).clamp(0.0, 1.0)
}
