// src/matching/matcher.rs - Best-candidate selection for one source record

use serde::{Deserialize, Serialize};

use crate::matching::geospatial::{haversine_distance_km, location_similarity};
use crate::matching::name::name_similarity;
use crate::matching::score::{overall_score, ScoreWeights};
use crate::models::core::{CandidateRecord, SourceRecord};
use crate::models::matching::{MatchMethodType, MatchResult};
use crate::utils::constants::DEFAULT_CONFIDENCE_THRESHOLD;

/// Tunables for a single match evaluation. Passed explicitly into every call;
/// there is no module-level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Minimum fused confidence for a candidate to be accepted.
    pub threshold: f64,
    /// Hard cutoff: candidates farther than this are excluded regardless of
    /// name similarity. Prevents generic names ("City Park") from linking
    /// across continents. Only enforceable when both records carry
    /// coordinates; location-less candidates are never distance-excluded.
    pub max_distance_km: Option<f64>,
    pub weights: ScoreWeights,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_distance_km: None,
            weights: ScoreWeights::default(),
        }
    }
}

/// Scores every candidate against `source` and returns the highest-scoring
/// one with its fused score, or `None` for an empty (or fully
/// distance-excluded) candidate list.
///
/// Ties break to the first candidate reaching the maximum, so the outcome is
/// deterministic for a fixed candidate ordering.
pub fn best_candidate<'a>(
    source: &SourceRecord,
    candidates: &'a [CandidateRecord],
    options: &MatchOptions,
) -> Option<(&'a CandidateRecord, f64)> {
    let mut best: Option<(&CandidateRecord, f64)> = None;

    for candidate in candidates {
        if let (Some(max_km), Some(p1), Some(p2)) = (
            options.max_distance_km,
            source.coordinates.as_ref(),
            candidate.coordinates.as_ref(),
        ) {
            if haversine_distance_km(p1, p2) > max_km {
                continue;
            }
        }

        let name_score = name_similarity(&source.name, &candidate.name);
        let location_score =
            location_similarity(source.coordinates.as_ref(), candidate.coordinates.as_ref());
        let score = overall_score(name_score, location_score, &options.weights);

        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }

    best
}

/// Finds the single best candidate at or above the confidence threshold.
///
/// Returns `None` when the candidate list is empty or the best fused score
/// falls below the threshold; "nothing qualified" is an expected outcome, not
/// an error.
pub fn find_best_match(
    source: &SourceRecord,
    candidates: &[CandidateRecord],
    options: &MatchOptions,
) -> Option<MatchResult> {
    let (candidate, score) = best_candidate(source, candidates, options)?;
    if score < options.threshold {
        return None;
    }
    Some(MatchResult {
        source_id: source.id.clone(),
        candidate_id: Some(candidate.id.clone()),
        confidence_score: score,
        match_method: MatchMethodType::NameLocationSimilarity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::core::{CandidateId, Coordinates, SourceId};

    fn source(name: &str, coords: Option<(f64, f64)>) -> SourceRecord {
        SourceRecord {
            id: SourceId("src-1".to_string()),
            name: name.to_string(),
            coordinates: coords.map(|(latitude, longitude)| Coordinates { latitude, longitude }),
            metadata: None,
        }
    }

    fn candidate(id: &str, name: &str, coords: Option<(f64, f64)>) -> CandidateRecord {
        CandidateRecord {
            id: CandidateId(id.to_string()),
            wikidata_id: Some(id.to_string()),
            name: name.to_string(),
            coordinates: coords.map(|(latitude, longitude)| Coordinates { latitude, longitude }),
            metadata: None,
        }
    }

    fn park_candidates() -> Vec<CandidateRecord> {
        vec![
            candidate("Q180", "Yellowstone National Park", Some((44.428, -110.5885))),
            candidate("Q62800", "Grand Teton National Park", Some((43.79, -110.68))),
            candidate("Q777183", "Acadia National Park", Some((44.35, -68.21))),
        ]
    }

    #[test]
    fn empty_candidate_list_matches_nothing() {
        let src = source("Yellowstone National Park", Some((44.428, -110.5885)));
        assert!(find_best_match(&src, &[], &MatchOptions::default()).is_none());
        assert!(best_candidate(&src, &[], &MatchOptions::default()).is_none());
    }

    #[test]
    fn identical_colocated_candidate_wins_above_threshold() {
        let src = source("Yellowstone National Park", Some((44.428, -110.5885)));
        let result = find_best_match(&src, &park_candidates(), &MatchOptions::default()).unwrap();
        assert_eq!(result.candidate_id, Some(CandidateId("Q180".to_string())));
        assert!(result.confidence_score > 0.8, "got {}", result.confidence_score);
        assert_eq!(result.match_method, MatchMethodType::NameLocationSimilarity);
    }

    #[test]
    fn unrelated_record_returns_none_at_high_threshold() {
        let src = source("Completely Different Park Name", Some((0.0, 0.0)));
        let options = MatchOptions { threshold: 0.9, ..Default::default() };
        assert!(find_best_match(&src, &park_candidates(), &options).is_none());
    }

    #[test]
    fn result_never_scores_below_threshold() {
        let src = source("Yellowstone NP", None);
        for threshold in [0.1, 0.3, 0.5, 0.8, 0.95] {
            let options = MatchOptions { threshold, ..Default::default() };
            if let Some(result) = find_best_match(&src, &park_candidates(), &options) {
                assert!(result.confidence_score >= threshold);
            }
        }
    }

    #[test]
    fn max_distance_excludes_far_candidates() {
        // Same generic name on two continents; only the nearby one may link.
        let src = source("City Park", Some((48.8566, 2.3522)));
        let candidates = vec![
            candidate("Q1", "City Park", Some((39.7392, -104.9903))), // Denver
            candidate("Q2", "City Park", Some((48.858, 2.353))),      // Paris, ~200 m away
        ];
        let options = MatchOptions { max_distance_km: Some(50.0), ..Default::default() };
        let result = find_best_match(&src, &candidates, &options).unwrap();
        assert_eq!(result.candidate_id, Some(CandidateId("Q2".to_string())));

        // Without the cutoff both survive, but the co-located one still wins
        // on the fused score.
        let result = find_best_match(&src, &candidates, &MatchOptions::default()).unwrap();
        assert_eq!(result.candidate_id, Some(CandidateId("Q2".to_string())));
    }

    #[test]
    fn all_candidates_distance_excluded_is_none() {
        let src = source("City Park", Some((48.8566, 2.3522)));
        let candidates = vec![candidate("Q1", "City Park", Some((39.7392, -104.9903)))];
        let options = MatchOptions { max_distance_km: Some(50.0), ..Default::default() };
        assert!(best_candidate(&src, &candidates, &options).is_none());
    }

    #[test]
    fn location_less_candidate_is_not_distance_excluded() {
        let src = source("Hidden Springs Park", Some((44.0, -110.0)));
        let candidates = vec![candidate("Q9", "Hidden Springs Park", None)];
        let options = MatchOptions {
            threshold: 0.5,
            max_distance_km: Some(10.0),
            ..Default::default()
        };
        let result = find_best_match(&src, &candidates, &options).unwrap();
        // Name-only signal: perfect name times the name weight.
        assert!((result.confidence_score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn tie_breaks_to_first_candidate() {
        let src = source("Riverside Park", None);
        let candidates = vec![
            candidate("Q1", "Riverside Park", None),
            candidate("Q2", "Riverside Park", None),
        ];
        let options = MatchOptions { threshold: 0.5, ..Default::default() };
        let result = find_best_match(&src, &candidates, &options).unwrap();
        assert_eq!(result.candidate_id, Some(CandidateId("Q1".to_string())));
    }
}
