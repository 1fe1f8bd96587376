//! DEM Fetcher Library
//!
//! Concurrent bulk downloader for DSM/DTM raster tiles. Per-region manifests
//! are resolved into download tasks, which a fixed pool of workers fetches
//! into a split/type directory tree with size verification and atomic
//! promotion. Re-running is safe and skips tiles that are already complete.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(DEFAULT_WORKER_COUNT, 8);
        assert_eq!(DEFAULT_LOG_FILE, "download_failures.log");
        assert_eq!(STAGING_SUFFIX, ".part");
        assert!(USER_AGENT.contains("DEM-Fetcher"));
    }

    #[test]
    fn test_error_types() {
        let app_error = AppError::generic("boom");
        assert_eq!(app_error.category(), "generic");
    }
}
