// src/main.rs - `link_places`: batch import driver for the linking engine
//
// The engine itself performs no I/O; this binary owns reading the two catalog
// exports, wiring a progress bar, and emitting the link report.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde::Serialize;
use uuid::Uuid;

use linker_lib::matching::manager::{link_all_parallel, LinkOptions};
use linker_lib::matching::matcher::MatchOptions;
use linker_lib::models::{BatchLinkReport, CandidateRecord, MatchResult, SourceRecord};
use linker_lib::utils::progress::channel_progress;

#[derive(Parser, Debug)]
#[command(
    name = "link_places",
    about = "Links park/place records from an authoritative catalog against a secondary open-data catalog"
)]
struct Cli {
    /// JSON array of source records from the authoritative catalog
    #[arg(long)]
    sources: PathBuf,

    /// JSON array of candidate records from the secondary catalog
    #[arg(long)]
    candidates: PathBuf,

    /// Minimum fused confidence for an accepted link
    #[arg(long, default_value_t = 0.8)]
    threshold: f64,

    /// Hard-exclude candidates farther than this many kilometers
    #[arg(long)]
    max_distance_km: Option<f64>,

    /// Number of concurrent linking chunks (defaults to CPU count)
    #[arg(long)]
    jobs: Option<usize>,

    /// Keep explicit no-match results in the report instead of only accepted links
    #[arg(long)]
    include_unmatched: bool,

    /// Write the JSON report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct RunReport {
    run_id: String,
    generated_at: chrono::DateTime<Utc>,
    threshold: f64,
    max_distance_km: Option<f64>,
    stats: linker_lib::models::LinkStats,
    avg_confidence: f64,
    results: Vec<MatchResult>,
    failures: Vec<linker_lib::models::RecordFailure>,
}

fn load_sources(path: &PathBuf) -> Result<Vec<SourceRecord>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read source records from {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse source records from {}", path.display()))
}

fn load_candidates(path: &PathBuf) -> Result<Vec<CandidateRecord>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read candidate records from {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse candidate records from {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let run_id = Uuid::new_v4().to_string();
    info!("Starting place linking run {}", run_id);
    let start_time = Instant::now();

    let sources = load_sources(&cli.sources)?;
    let candidates = Arc::new(load_candidates(&cli.candidates)?);
    info!(
        "Loaded {} source records and {} candidate records",
        sources.len(),
        candidates.len()
    );

    let pb = ProgressBar::new(sources.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  🌲 [{elapsed_precise}] {bar:30.green/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    pb.set_message("Linking place records...");

    let (progress, mut progress_rx) = channel_progress();
    let pb_clone = pb.clone();
    let progress_task = tokio::spawn(async move {
        while let Some(event) = progress_rx.recv().await {
            pb_clone.set_position(event.processed as u64);
            pb_clone.set_message(format!("{} linked", event.matched));
        }
    });

    let options = LinkOptions {
        match_options: MatchOptions {
            threshold: cli.threshold,
            max_distance_km: cli.max_distance_km,
            ..Default::default()
        },
        progress: Some(progress),
    };

    let report: BatchLinkReport =
        link_all_parallel(sources, candidates, options, cli.jobs).await?;
    progress_task.await.ok();
    pb.finish_with_message(format!(
        "{} linked, {} no-match, {} failed",
        report.stats.links_created, report.stats.no_match_count, report.stats.record_failures
    ));

    let results = if cli.include_unmatched {
        report.results
    } else {
        report.results.into_iter().filter(|r| r.is_match()).collect()
    };

    let run_report = RunReport {
        run_id,
        generated_at: Utc::now(),
        threshold: cli.threshold,
        max_distance_km: cli.max_distance_km,
        avg_confidence: report.stats.avg_confidence(),
        stats: report.stats,
        results,
        failures: report.failures,
    };

    let json = serde_json::to_string_pretty(&run_report).context("Failed to encode run report")?;
    match &cli.output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", json),
    }

    info!("Linking run complete in {:.2?}", start_time.elapsed());
    Ok(())
}
