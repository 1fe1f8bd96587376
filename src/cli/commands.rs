//! Command handlers for the CLI
//!
//! `handle_download` merges flags over the loaded configuration, resolves the
//! manifests and either previews the work (`--dry-run`) or runs it through the
//! coordinator and prints the summary.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use super::args::{Cli, DownloadArgs, GlobalArgs};
use crate::app::manifest::{resolve_tasks, Resolution};
use crate::app::{ClientConfig, Coordinator, CoordinatorConfig, SessionResult, TileClient, WorkerConfig};
use crate::config::AppConfig;
use crate::constants::report;
use crate::errors::{AppError, Result};

/// Effective settings for one download run
#[derive(Debug, Clone)]
pub struct DownloadSettings {
    pub source_root: PathBuf,
    pub output_root: PathBuf,
    pub log_file: PathBuf,
    pub client: ClientConfig,
    pub worker: WorkerConfig,
    pub progress_bar: bool,
    pub dry_run: bool,
}

impl DownloadSettings {
    /// Layer command-line flags over the configuration file values
    pub fn merge(global: &GlobalArgs, args: &DownloadArgs, config: &AppConfig) -> Self {
        let mut worker = config.worker_config();
        if let Some(threads) = args.threads {
            worker.worker_count = threads;
        }

        Self {
            source_root: args
                .source_root
                .clone()
                .unwrap_or_else(|| config.paths.source_root.clone()),
            output_root: args
                .output_root
                .clone()
                .unwrap_or_else(|| config.paths.output_root.clone()),
            log_file: args
                .log_file
                .clone()
                .unwrap_or_else(|| config.paths.log_file.clone()),
            client: config.client_config(),
            worker,
            progress_bar: config.workers.progress_bar && !global.quiet,
            dry_run: args.dry_run,
        }
    }

    /// Coordinator configuration for these settings
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            worker_config: self.worker.clone(),
            failure_log: self.log_file.clone(),
            enable_progress_bar: self.progress_bar,
        }
    }
}

/// Handle a download run
pub async fn handle_download(cli: &Cli, config: &AppConfig) -> Result<()> {
    let start_time = Instant::now();

    cli.download.validate().map_err(AppError::generic)?;
    let settings = DownloadSettings::merge(&cli.global, &cli.download, config);
    settings.worker.validate()?;

    info!(
        "Resolving manifests under {} (output to {})",
        settings.source_root.display(),
        settings.output_root.display()
    );
    let resolution = resolve_tasks(&settings.source_root, &settings.output_root).await?;

    if settings.dry_run {
        print_dry_run(&resolution);
        return Ok(());
    }

    if resolution.is_empty() {
        warn!(
            "No tiles found under {}",
            settings.source_root.display()
        );
    }

    let session_result = run_download(&settings, resolution).await?;

    info!("Download command completed in {:?}", start_time.elapsed());
    if cli.global.verbose || cli.global.very_verbose {
        print_detailed_summary(&session_result);
    }
    println!("{}", session_result.summary_line());

    Ok(())
}

/// Execute a resolution with the given settings
pub async fn run_download(settings: &DownloadSettings, resolution: Resolution) -> Result<SessionResult> {
    let client = Arc::new(TileClient::with_config(settings.client.clone())?);
    let coordinator = Coordinator::new(settings.coordinator_config(), client);
    coordinator.run(resolution).await
}

fn print_dry_run(resolution: &Resolution) {
    println!(
        "Dry run - would process {} tiles ({} referenced tiles have no URL):",
        resolution.tasks.len(),
        resolution.missing.len()
    );
    for (i, task) in resolution
        .tasks
        .iter()
        .take(report::DRY_RUN_PREVIEW)
        .enumerate()
    {
        println!("  {}. {} -> {}", i + 1, task.url, task.destination.display());
    }
    if resolution.tasks.len() > report::DRY_RUN_PREVIEW {
        println!(
            "  ... and {} more tiles",
            resolution.tasks.len() - report::DRY_RUN_PREVIEW
        );
    }
}

fn print_detailed_summary(result: &SessionResult) {
    let stats = &result.stats;
    println!("\n📊 Download Summary:");
    println!("  Total tasks: {}", stats.total_tasks);
    println!("  Downloaded: {}", stats.downloaded);
    println!("  Skipped (already complete): {}", stats.skipped);
    println!("  Failed: {}", stats.failed);
    println!("  Missing URLs: {}", stats.missing);
    println!("  Data downloaded: {}", stats.format_bytes());
    println!("  Average rate: {}", stats.format_rate());
    println!("  Total time: {}", stats.format_duration());
    println!();
}
