//! DEM Fetcher CLI application
//!
//! Command-line interface for bulk downloading DSM/DTM raster tiles listed in
//! per-region manifests.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use dem_fetcher::cli::{handle_download, Cli};
use dem_fetcher::config::AppConfig;
use dem_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    // Partial failures are reported by the run itself; only hard errors get here
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config = AppConfig::load(cli.global.config.as_deref()).await?;

    init_logging(&cli, &config)?;

    info!("DEM Fetcher v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &config.source {
        info!("Loaded configuration from: {}", path.display());
    }

    handle_download(&cli, &config).await
}

/// Initialize logging based on CLI verbosity settings and the config file
fn init_logging(cli: &Cli, config: &AppConfig) -> Result<()> {
    let log_level = cli.log_level(config.log_level()?);

    let directive: tracing_subscriber::filter::Directive = format!("dem_fetcher={}", log_level)
        .parse()
        .map_err(|e| dem_fetcher::AppError::generic(format!("Invalid log directive: {}", e)))?;
    let filter = EnvFilter::from_default_env().add_directive(directive);

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .with_writer(std::io::stderr)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }

    Ok(())
}
