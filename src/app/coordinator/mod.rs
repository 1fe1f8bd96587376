//! Download orchestration
//!
//! The coordinator is the control plane of a run. It queues every resolved
//! task, starts the worker pool and consumes worker outcomes on a single
//! aggregator loop that owns the statistics and the failure list. Once the
//! last worker is done it appends the missing-URL entries, writes the failure
//! log and hands back a [`SessionResult`].
//!
//! - [`config`] - Configuration structures and validation
//! - [`stats`] - Download statistics and the session result
//! - [`progress`] - Progress bar fed by the aggregator
//! - [`report`] - Failure log output
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use dem_fetcher::app::{resolve_tasks, Coordinator, CoordinatorConfig, TileClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolution = resolve_tasks(Path::new("dataset"), Path::new("dataset")).await?;
//! let client = Arc::new(TileClient::new()?);
//!
//! let coordinator = Coordinator::new(CoordinatorConfig::default().with_worker_count(4), client);
//! let result = coordinator.run(resolution).await?;
//! println!("{}", result.summary_line());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod progress;
pub mod report;
pub mod stats;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::app::client::TileClient;
use crate::app::manifest::Resolution;
use crate::app::models::{DownloadTask, FailureRecord};
use crate::app::queue::WorkQueue;
use crate::app::worker::{remove_numbered_staging, TaskOutcome, WorkerEvent, WorkerPool};
use crate::constants::workers;
use crate::errors::Result;

pub use config::CoordinatorConfig;
pub use progress::ProgressReporter;
pub use report::write_failure_log;
pub use stats::{format_bytes, DownloadStats, SessionResult};

/// Main coordinator for orchestrating downloads
pub struct Coordinator {
    config: CoordinatorConfig,
    client: Arc<TileClient>,
}

impl Coordinator {
    /// Create a new coordinator with the given configuration and shared client
    pub fn new(config: CoordinatorConfig, client: Arc<TileClient>) -> Self {
        Self { config, client }
    }

    /// Execute every task in `resolution` and report the outcome
    ///
    /// Task failures never abort the run; they are collected and written to
    /// the failure log. Only configuration and log-writing problems are
    /// returned as errors.
    pub async fn run(&self, resolution: Resolution) -> Result<SessionResult> {
        self.config.validate()?;

        let Resolution { tasks, missing } = resolution;
        let mut stats = DownloadStats::new_with_expected_tasks(tasks.len());
        stats.missing = missing.len();

        clear_numbered_staging(&tasks).await;

        let queue = Arc::new(WorkQueue::new());
        queue.add_work_bulk(tasks).await;

        info!(
            "Starting download of {} tiles with {} workers ({} missing URLs)",
            stats.total_tasks, self.config.worker_config.worker_count, stats.missing
        );

        let (outcome_tx, outcome_rx) = mpsc::channel(workers::OUTCOME_CHANNEL_SIZE);
        let mut pool = WorkerPool::new(
            self.config.worker_config.clone(),
            queue.clone(),
            self.client.clone(),
        );
        pool.start(outcome_tx)?;

        let progress = ProgressReporter::new(stats.total_tasks, self.config.enable_progress_bar);
        let mut failures = aggregate_outcomes(outcome_rx, &mut stats, &progress).await;
        progress.finish();

        let processed = pool.wait().await;
        if processed != stats.total_processed() {
            warn!(
                "Workers processed {} tasks but {} outcomes were reported",
                processed,
                stats.total_processed()
            );
        }

        failures.extend(missing.iter().map(FailureRecord::missing));

        write_failure_log(&self.config.failure_log, &failures).await?;

        stats.update_duration();
        info!(
            "Run finished: {} downloaded, {} skipped, {} failed, {} missing in {}",
            stats.downloaded,
            stats.skipped,
            stats.failed,
            stats.missing,
            stats.format_duration()
        );

        Ok(SessionResult {
            stats,
            failures,
            log_path: self.config.failure_log.clone(),
        })
    }

    /// Get the coordinator configuration
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }
}

/// Drop numbered staging files from earlier runs before any worker starts
///
/// Workers only clear the staging path they are about to use, so a numbered
/// file from a run that listed a tile more often than this one would
/// otherwise stay behind.
async fn clear_numbered_staging(tasks: &[DownloadTask]) {
    for task in tasks.iter().filter(|task| task.duplicate_index == 0) {
        match remove_numbered_staging(&task.destination).await {
            Ok(0) => {}
            Ok(removed) => debug!(
                "Removed {} stale staging files for {}",
                removed,
                task.destination.display()
            ),
            Err(e) => warn!(
                "Could not clear staging files for {}: {}",
                task.destination.display(),
                e
            ),
        }
    }
}

/// Single consumer of worker outcomes; returns once every sender is dropped
async fn aggregate_outcomes(
    mut outcome_rx: mpsc::Receiver<WorkerEvent>,
    stats: &mut DownloadStats,
    progress: &ProgressReporter,
) -> Vec<FailureRecord> {
    let mut failures = Vec::new();

    while let Some(event) = outcome_rx.recv().await {
        stats.record(&event.outcome);
        progress.advance(&event.outcome, stats);

        if let TaskOutcome::Failed(record) = event.outcome {
            failures.push(record);
        }
    }

    failures
}
