//! Progress bar driven by the outcome aggregator
//!
//! indicatif draws to stderr and stays silent when stderr is not a terminal.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::stats::DownloadStats;
use crate::app::worker::TaskOutcome;

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} (ETA: {eta}) {msg}";

/// Task-level progress display
#[derive(Debug)]
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a reporter over `total_tasks`; a disabled reporter draws nothing
    pub fn new(total_tasks: usize, enabled: bool) -> Self {
        if !enabled || total_tasks == 0 {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new(total_tasks as u64);
        let style = ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)
            .map(|style| style.progress_chars("##-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Advance by one finished task
    pub fn advance(&self, outcome: &TaskOutcome, stats: &DownloadStats) {
        self.bar.inc(1);
        if outcome.is_failure() || self.bar.position() % 10 == 0 {
            self.bar.set_message(format!(
                "{} new, {} skipped, {} failed",
                stats.downloaded, stats.skipped, stats.failed
            ));
        }
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Whether anything is drawn
    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }
}
