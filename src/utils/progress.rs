// src/utils/progress.rs - Progress reporting for long-running link jobs

use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// A snapshot of batch-linking progress, emitted after each processed record
/// (sequential linker) or each completed chunk (parallel linker).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub processed: usize,
    pub total: usize,
    pub matched: usize,
}

impl ProgressEvent {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.processed as f64 / self.total as f64 * 100.0
        }
    }
}

/// Type alias for progress callback functions. Absence of a callback is a
/// no-op, never an error.
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Creates a callback wired to an unbounded channel so callers can subscribe
/// to progress events instead of supplying a closure (e.g. to drive a CLI
/// progress bar from another task). Send failures after the receiver is
/// dropped are ignored; progress is advisory.
pub fn channel_progress() -> (ProgressCallback, UnboundedReceiver<ProgressEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let callback: ProgressCallback = Arc::new(move |event: ProgressEvent| {
        let _ = tx.send(event);
    });
    (callback, rx)
}

/// Helper to create a logging-only callback for jobs that do not need a
/// richer progress sink.
pub fn create_logging_callback(job_name: &str) -> ProgressCallback {
    let job_name = job_name.to_string();
    Arc::new(move |event: ProgressEvent| {
        debug!(
            "[{}] Progress: {}/{} ({:.1}%), {} matched",
            job_name,
            event.processed,
            event.total,
            event.percent(),
            event.matched
        );
    })
}

/// Convenience macro for reporting progress from linking code.
#[macro_export]
macro_rules! report_progress {
    ($callback:expr, $processed:expr, $total:expr, $matched:expr) => {
        if let Some(ref cb) = $callback {
            cb($crate::utils::progress::ProgressEvent {
                processed: $processed,
                total: $total,
                matched: $matched,
            });
        }
    };
}
