//! Command-line argument parsing for DEM Fetcher
//!
//! This module defines the CLI structure using clap derive macros. Every
//! download setting also has a config-file counterpart; flags given here
//! take precedence over the file.

use std::path::PathBuf;

use clap::{Args, Parser};

/// DEM Fetcher - Bulk download DSM/DTM raster tiles
#[derive(Parser, Debug)]
#[command(
    name = "dem_fetcher",
    version,
    about = "Download DSM/DTM tiles listed in per-region manifests",
    long_about = "Reads per-region URL lists and split lists under <source-root>/DSMs and <source-root>/DTMs,
downloads every referenced tile into <output-root>/<split>/<dsm|dtm>/ and writes a failure log.
Re-running skips tiles that are already complete."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Download options
    #[command(flatten)]
    pub download: DownloadArgs,
}

/// Global arguments
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, conflicts_with_all = ["verbose", "very_verbose"])]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for the download run
#[derive(Args, Debug, Clone, Default)]
pub struct DownloadArgs {
    /// Directory containing DSMs/ and DTMs/ [default: dataset]
    #[arg(long, value_name = "DIR")]
    pub source_root: Option<PathBuf>,

    /// Directory receiving the split/type output tree [default: dataset]
    #[arg(long, value_name = "DIR")]
    pub output_root: Option<PathBuf>,

    /// Number of concurrent download workers [default: 8]
    #[arg(short = 'w', long = "threads", value_name = "N")]
    pub threads: Option<usize>,

    /// Failure log path [default: download_failures.log]
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Dry run - show what would be downloaded without downloading
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log level selected by the verbosity flags, falling back to `configured`
    pub fn log_level(&self, configured: Option<tracing::Level>) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            configured.unwrap_or(tracing::Level::WARN)
        }
    }
}

impl DownloadArgs {
    /// Reject values clap cannot check on its own
    pub fn validate(&self) -> Result<(), String> {
        if self.threads == Some(0) {
            return Err("Worker count must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_everything_to_config() {
        let cli = Cli::try_parse_from(["dem_fetcher"]).unwrap();
        assert!(cli.download.source_root.is_none());
        assert!(cli.download.output_root.is_none());
        assert!(cli.download.threads.is_none());
        assert!(cli.download.log_file.is_none());
        assert!(!cli.download.dry_run);
        assert_eq!(cli.log_level(None), tracing::Level::WARN);
        assert_eq!(cli.log_level(Some(tracing::Level::INFO)), tracing::Level::INFO);
    }

    #[test]
    fn test_download_flags() {
        let cli = Cli::try_parse_from([
            "dem_fetcher",
            "--source-root",
            "/in",
            "--output-root",
            "/out",
            "-w",
            "4",
            "--log-file",
            "fails.log",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(cli.download.source_root, Some(PathBuf::from("/in")));
        assert_eq!(cli.download.output_root, Some(PathBuf::from("/out")));
        assert_eq!(cli.download.threads, Some(4));
        assert_eq!(cli.download.log_file, Some(PathBuf::from("fails.log")));
        assert!(cli.download.dry_run);

        let cli = Cli::try_parse_from(["dem_fetcher", "--threads", "16"]).unwrap();
        assert_eq!(cli.download.threads, Some(16));
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::try_parse_from(["dem_fetcher", "-v"]).unwrap();
        assert_eq!(cli.log_level(Some(tracing::Level::ERROR)), tracing::Level::INFO);

        let cli = Cli::try_parse_from(["dem_fetcher", "--very-verbose"]).unwrap();
        assert_eq!(cli.log_level(None), tracing::Level::DEBUG);

        let cli = Cli::try_parse_from(["dem_fetcher", "-q"]).unwrap();
        assert_eq!(cli.log_level(None), tracing::Level::ERROR);

        assert!(Cli::try_parse_from(["dem_fetcher", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let cli = Cli::try_parse_from(["dem_fetcher", "-w", "0"]).unwrap();
        assert!(cli.download.validate().is_err());
    }
}
