//! Download statistics tracking and the final session result

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::models::FailureRecord;
use crate::app::worker::TaskOutcome;

/// Aggregated download statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadStats {
    /// Tasks submitted to the pool
    pub total_tasks: usize,
    /// Tiles transferred and promoted
    pub downloaded: usize,
    /// Tiles already complete on disk
    pub skipped: usize,
    /// Tasks that failed inside a worker
    pub failed: usize,
    /// Split-list references with no URL
    pub missing: usize,
    /// Total bytes written to destinations this run
    pub bytes_downloaded: u64,
    /// Start time of download session
    pub session_start: DateTime<Utc>,
    /// Current session duration
    pub session_duration: Duration,
}

impl Default for DownloadStats {
    fn default() -> Self {
        Self {
            total_tasks: 0,
            downloaded: 0,
            skipped: 0,
            failed: 0,
            missing: 0,
            bytes_downloaded: 0,
            session_start: Utc::now(),
            session_duration: Duration::ZERO,
        }
    }
}

impl DownloadStats {
    /// Create new statistics with the expected task count
    pub fn new_with_expected_tasks(total_tasks: usize) -> Self {
        Self {
            total_tasks,
            ..Default::default()
        }
    }

    /// Fold one worker outcome into the counters
    pub fn record(&mut self, outcome: &TaskOutcome) {
        match outcome {
            TaskOutcome::Skipped => self.skipped += 1,
            TaskOutcome::Downloaded { bytes } => {
                self.downloaded += 1;
                self.bytes_downloaded += bytes;
            }
            TaskOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Tasks with a reported outcome
    pub fn total_processed(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }

    /// Worker failures plus missing URLs
    pub fn total_failures(&self) -> usize {
        self.failed + self.missing
    }

    /// Update session duration from start time
    pub fn update_duration(&mut self) {
        self.session_duration = Utc::now()
            .signed_duration_since(self.session_start)
            .to_std()
            .unwrap_or(Duration::ZERO);
    }

    /// Average transfer rate over the session
    pub fn download_rate_bps(&self) -> f64 {
        let secs = self.session_duration.as_secs_f64();
        if secs > 0.0 {
            self.bytes_downloaded as f64 / secs
        } else {
            0.0
        }
    }

    /// Format total bytes as human-readable string
    pub fn format_bytes(&self) -> String {
        format_bytes(self.bytes_downloaded)
    }

    /// Format session duration as human-readable string
    pub fn format_duration(&self) -> String {
        format_duration(self.session_duration)
    }

    /// Format the average transfer rate as human-readable string
    pub fn format_rate(&self) -> String {
        format!("{}/s", format_bytes(self.download_rate_bps() as u64))
    }
}

/// Final result of a download session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResult {
    /// Final download statistics
    pub stats: DownloadStats,
    /// Worker failures followed by missing-URL entries
    pub failures: Vec<FailureRecord>,
    /// Failure log location, written only if `failures` is non-empty
    pub log_path: PathBuf,
}

impl SessionResult {
    /// Check if the session had any failures
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// The one line printed at the end of every run
    pub fn summary_line(&self) -> String {
        if self.has_failures() {
            format!(
                "Finished with {} failures. See {}.",
                self.failures.len(),
                self.log_path.display()
            )
        } else {
            "Download completed without failures.".to_string()
        }
    }
}

/// Format a byte count as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    let bytes = bytes as f64;
    if bytes < 1024.0 {
        format!("{} B", bytes)
    } else if bytes < 1024.0 * 1024.0 {
        format!("{:.1} KB", bytes / 1024.0)
    } else if bytes < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.1} MB", bytes / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Format a duration as human-readable string
fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();

    if total_secs < 60 {
        format!("{}s", total_secs)
    } else if total_secs < 3600 {
        format!("{}m{}s", total_secs / 60, total_secs % 60)
    } else {
        format!("{}h{}m", total_secs / 3600, (total_secs % 3600) / 60)
    }
}
