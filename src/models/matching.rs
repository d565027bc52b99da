// src/models/matching.rs

use serde::{Deserialize, Serialize};

use crate::models::core::{CandidateId, SourceId};

/// How a link between a source and a candidate record was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethodType {
    /// Fused lexical + geospatial similarity (the only method currently wired
    /// into the batch linker).
    NameLocationSimilarity,
}

impl MatchMethodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NameLocationSimilarity => "name_location_similarity",
        }
    }
}

/// The per-record outcome of matching one source record against the candidate
/// collection.
///
/// An explicit non-match (`candidate_id == None`) is a valid terminal state,
/// not an omission; `confidence_score` then records the best score observed so
/// the caller can audit near-misses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub source_id: SourceId,
    pub candidate_id: Option<CandidateId>,
    pub confidence_score: f64,
    pub match_method: MatchMethodType,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        self.candidate_id.is_some()
    }
}

/// A record the linker could not evaluate at all, distinct from "nothing
/// matched".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordFailure {
    pub source_id: SourceId,
    pub reason: String,
}

/// Counters accumulated across one batch link run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkStats {
    pub records_processed: usize,
    pub links_created: usize,
    pub no_match_count: usize,
    pub record_failures: usize,
    /// Sum of confidence scores of accepted links, kept so the average can be
    /// derived without retaining every score.
    pub confidence_sum: f64,
}

impl LinkStats {
    pub fn avg_confidence(&self) -> f64 {
        if self.links_created > 0 {
            self.confidence_sum / self.links_created as f64
        } else {
            0.0
        }
    }

    pub fn merge(&mut self, other: &LinkStats) {
        self.records_processed += other.records_processed;
        self.links_created += other.links_created;
        self.no_match_count += other.no_match_count;
        self.record_failures += other.record_failures;
        self.confidence_sum += other.confidence_sum;
    }
}

/// Everything a batch link run produces: one `MatchResult` per evaluable
/// source record (in input order), per-record failures, and run counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchLinkReport {
    pub results: Vec<MatchResult>,
    pub failures: Vec<RecordFailure>,
    pub stats: LinkStats,
}

impl BatchLinkReport {
    /// The accepted-links view: only results that actually claimed a
    /// candidate. The caller decides whether to persist non-matches.
    pub fn accepted_links(&self) -> impl Iterator<Item = &MatchResult> {
        self.results.iter().filter(|r| r.is_match())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_type_serializes_as_fixed_tag() {
        let json = serde_json::to_string(&MatchMethodType::NameLocationSimilarity).unwrap();
        assert_eq!(json, "\"name_location_similarity\"");
        assert_eq!(
            MatchMethodType::NameLocationSimilarity.as_str(),
            "name_location_similarity"
        );
    }

    #[test]
    fn stats_average_handles_empty_run() {
        let stats = LinkStats::default();
        assert_eq!(stats.avg_confidence(), 0.0);
    }

    #[test]
    fn accepted_links_filters_non_matches() {
        let report = BatchLinkReport {
            results: vec![
                MatchResult {
                    source_id: SourceId("a".into()),
                    candidate_id: Some(CandidateId("Q1".into())),
                    confidence_score: 0.95,
                    match_method: MatchMethodType::NameLocationSimilarity,
                },
                MatchResult {
                    source_id: SourceId("b".into()),
                    candidate_id: None,
                    confidence_score: 0.4,
                    match_method: MatchMethodType::NameLocationSimilarity,
                },
            ],
            failures: Vec::new(),
            stats: LinkStats::default(),
        };
        let accepted: Vec<_> = report.accepted_links().collect();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].source_id.0, "a");
    }
}
