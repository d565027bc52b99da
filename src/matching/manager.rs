// src/matching/manager.rs - Batch orchestration of the matcher

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use futures::future::join_all;
use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::matching::matcher::{best_candidate, MatchOptions};
use crate::models::core::{CandidateRecord, SourceRecord};
use crate::models::matching::{
    BatchLinkReport, LinkStats, MatchMethodType, MatchResult, RecordFailure,
};
use crate::report_progress;
use crate::utils::progress::ProgressCallback;

/// Source records evaluated per spawned task in the parallel linker.
const BATCH_SIZE: usize = 200;

/// Tunables for a batch link run.
#[derive(Clone, Default)]
pub struct LinkOptions {
    pub match_options: MatchOptions,
    pub progress: Option<ProgressCallback>,
}

/// The per-record outcome before it is folded into a report.
enum RecordOutcome {
    Evaluated(MatchResult),
    Failed(RecordFailure),
}

/// Evaluates one source record against the full candidate list.
///
/// A record whose name is blank carries no usable signal at all and is
/// reported as a failure rather than a no-match; every other record yields a
/// `MatchResult`, with the best observed score retained on non-matches for
/// auditing.
fn evaluate_record(
    source: &SourceRecord,
    candidates: &[CandidateRecord],
    options: &MatchOptions,
) -> RecordOutcome {
    if source.name.trim().is_empty() {
        return RecordOutcome::Failed(RecordFailure {
            source_id: source.id.clone(),
            reason: "record has no usable name".to_string(),
        });
    }

    let best = best_candidate(source, candidates, options);
    let result = match best {
        Some((candidate, score)) if score >= options.threshold => MatchResult {
            source_id: source.id.clone(),
            candidate_id: Some(candidate.id.clone()),
            confidence_score: score,
            match_method: MatchMethodType::NameLocationSimilarity,
        },
        Some((_, score)) => MatchResult {
            source_id: source.id.clone(),
            candidate_id: None,
            confidence_score: score,
            match_method: MatchMethodType::NameLocationSimilarity,
        },
        None => MatchResult {
            source_id: source.id.clone(),
            candidate_id: None,
            confidence_score: 0.0,
            match_method: MatchMethodType::NameLocationSimilarity,
        },
    };
    RecordOutcome::Evaluated(result)
}

fn fold_outcome(outcome: RecordOutcome, report: &mut BatchLinkReport) {
    match outcome {
        RecordOutcome::Evaluated(result) => {
            report.stats.records_processed += 1;
            if result.is_match() {
                report.stats.links_created += 1;
                report.stats.confidence_sum += result.confidence_score;
            } else {
                report.stats.no_match_count += 1;
            }
            report.results.push(result);
        }
        RecordOutcome::Failed(failure) => {
            debug!("Linker: Record {} failed evaluation: {}", failure.source_id.0, failure.reason);
            report.stats.records_processed += 1;
            report.stats.record_failures += 1;
            report.failures.push(failure);
        }
    }
}

/// Links every source record against the full candidate list, sequentially.
///
/// Emits one `MatchResult` per evaluable source record in input order and
/// reports progress after each record. Empty sources or empty candidates
/// yield an empty result list, not an error.
pub fn link_all(
    sources: &[SourceRecord],
    candidates: &[CandidateRecord],
    options: &LinkOptions,
) -> BatchLinkReport {
    let start_time = Instant::now();
    let total = sources.len();
    info!(
        "Linker: Starting sequential link of {} source records against {} candidates",
        total,
        candidates.len()
    );

    let mut report = BatchLinkReport::default();

    if sources.is_empty() || candidates.is_empty() {
        report_progress!(options.progress, 0, total, 0);
        info!("Linker: Nothing to link (empty sources or candidates)");
        return report;
    }

    for (processed, source) in sources.iter().enumerate() {
        let outcome = evaluate_record(source, candidates, &options.match_options);
        fold_outcome(outcome, &mut report);
        report_progress!(options.progress, processed + 1, total, report.stats.links_created);
    }

    info!(
        "Linker: Sequential link complete in {:.2?}: {} processed, {} linked, {} no-match, {} failed",
        start_time.elapsed(),
        report.stats.records_processed,
        report.stats.links_created,
        report.stats.no_match_count,
        report.stats.record_failures
    );
    report
}

/// Parallel variant of [`link_all`].
///
/// Source records are independent, so they are sharded into chunks fanned out
/// over `tokio::spawn` tasks with no shared mutable state beyond the stats
/// accumulator. Result order matches input order; progress is reported per
/// completed chunk. `max_concurrent` defaults to the number of CPUs.
pub async fn link_all_parallel(
    sources: Vec<SourceRecord>,
    candidates: Arc<Vec<CandidateRecord>>,
    options: LinkOptions,
    max_concurrent: Option<usize>,
) -> Result<BatchLinkReport> {
    let start_time = Instant::now();
    let total = sources.len();
    let max_concurrent = max_concurrent.unwrap_or_else(num_cpus::get).max(1);
    info!(
        "Linker: Starting parallel link of {} source records against {} candidates ({} concurrent chunks)",
        total,
        candidates.len(),
        max_concurrent
    );

    if sources.is_empty() || candidates.is_empty() {
        report_progress!(options.progress, 0, total, 0);
        info!("Linker: Nothing to link (empty sources or candidates)");
        return Ok(BatchLinkReport::default());
    }

    let stats_mutex = Arc::new(Mutex::new(LinkStats::default()));
    let mut chunk_outputs: Vec<(usize, Vec<MatchResult>, Vec<RecordFailure>)> = Vec::new();
    let chunks: Vec<Vec<SourceRecord>> =
        sources.chunks(BATCH_SIZE).map(|chunk| chunk.to_vec()).collect();
    let total_chunks = chunks.len();
    let mut chunks_done = 0usize;

    for (wave_idx, wave) in chunks.chunks(max_concurrent).enumerate() {
        let mut chunk_futures = Vec::new();
        for (idx_in_wave, chunk) in wave.iter().enumerate() {
            let chunk_offset = (wave_idx * max_concurrent + idx_in_wave) * BATCH_SIZE;
            let chunk_records = chunk.clone();
            let candidates_clone = Arc::clone(&candidates);
            let match_options = options.match_options;
            let stats_clone = Arc::clone(&stats_mutex);

            chunk_futures.push(tokio::spawn(async move {
                let mut chunk_report = BatchLinkReport::default();
                for source in &chunk_records {
                    let outcome = evaluate_record(source, &candidates_clone, &match_options);
                    fold_outcome(outcome, &mut chunk_report);
                }
                let mut stats_guard = stats_clone.lock().await;
                stats_guard.merge(&chunk_report.stats);
                (chunk_offset, chunk_report.results, chunk_report.failures)
            }));
        }

        let wave_results = join_all(chunk_futures).await;
        for joined in wave_results {
            match joined {
                Ok(output) => {
                    chunks_done += 1;
                    chunk_outputs.push(output);
                }
                Err(e) => {
                    warn!("Linker: A chunk task failed: {:?}", e);
                    return Err(e).context("Linker: chunk task panicked");
                }
            }
        }

        let stats_guard = stats_mutex.lock().await;
        report_progress!(
            options.progress,
            stats_guard.records_processed,
            total,
            stats_guard.links_created
        );
        debug!(
            "Linker: {}/{} chunks complete ({} records)",
            chunks_done, total_chunks, stats_guard.records_processed
        );
    }

    // Reassemble in input order; chunks are contiguous slices of the input.
    chunk_outputs.sort_by_key(|(offset, _, _)| *offset);
    let mut report = BatchLinkReport {
        stats: Arc::try_unwrap(stats_mutex)
            .map_err(|_| anyhow::anyhow!("Linker: stats mutex still shared after join"))?
            .into_inner(),
        ..Default::default()
    };
    for (_, results, failures) in chunk_outputs {
        report.results.extend(results);
        report.failures.extend(failures);
    }

    info!(
        "Linker: Parallel link complete in {:.2?}: {} processed, {} linked, {} no-match, {} failed (avg confidence {:.4})",
        start_time.elapsed(),
        report.stats.records_processed,
        report.stats.links_created,
        report.stats.no_match_count,
        report.stats.record_failures,
        report.stats.avg_confidence()
    );
    Ok(report)
}
