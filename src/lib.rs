// src/lib.rs

pub mod matching;
pub mod models;
pub mod utils;

pub use matching::manager::{link_all, link_all_parallel, LinkOptions};
pub use matching::matcher::{best_candidate, find_best_match, MatchOptions};
pub use matching::score::ScoreWeights;
pub use models::{
    BatchLinkReport, CandidateId, CandidateRecord, Coordinates, LinkStats, MatchMethodType,
    MatchResult, RecordFailure, SourceId, SourceRecord,
};
pub use utils::progress::{channel_progress, ProgressCallback, ProgressEvent};
