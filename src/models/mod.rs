pub mod core;
pub mod matching;

pub use self::core::{CandidateId, CandidateRecord, Coordinates, SourceId, SourceRecord};
pub use self::matching::{
    BatchLinkReport, LinkStats, MatchMethodType, MatchResult, RecordFailure,
};
