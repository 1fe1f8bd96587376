//! Application constants for DEM Fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Source and output dataset layout
pub mod layout {
    /// Source folder holding per-region surface model manifests
    pub const DSM_SOURCE_DIR: &str = "DSMs";

    /// Source folder holding per-region terrain model manifests
    pub const DTM_SOURCE_DIR: &str = "DTMs";

    /// Output folder name for surface model tiles
    pub const DSM_OUTPUT_DIR: &str = "dsm";

    /// Output folder name for terrain model tiles
    pub const DTM_OUTPUT_DIR: &str = "dtm";

    /// Extension of the per-region URL list (compared case-insensitively)
    pub const URL_LIST_EXTENSION: &str = "csv";

    /// Extension of the per-region split lists (compared case-insensitively)
    pub const SPLIT_LIST_EXTENSION: &str = "txt";

    /// Characters stripped from region names when building output filenames
    pub const REGION_STRIP_CHARS: &[char] = &['.'];

    /// Default source root
    pub const DEFAULT_SOURCE_ROOT: &str = "dataset";

    /// Default output root
    pub const DEFAULT_OUTPUT_ROOT: &str = "dataset";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("DEM-Fetcher/", env!("CARGO_PKG_VERSION"));

    /// Timeout for the metadata-only size probe
    pub const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

    /// Timeout for sending a download request and for each body read
    pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum number of redirects to follow
    pub const MAX_REDIRECTS: usize = 10;
}

/// File operation constants
pub mod files {
    /// Suffix appended to the destination path while a download is staged
    pub const STAGING_SUFFIX: &str = ".part";

    /// Write buffer size used when streaming a body to disk (1 MiB)
    pub const CHUNK_SIZE: usize = 1024 * 1024;
}

/// Worker and concurrency configuration
pub mod workers {
    /// Default number of download workers
    pub const DEFAULT_WORKER_COUNT: usize = 8;

    /// Upper bound accepted for the worker count
    pub const MAX_WORKER_COUNT: usize = 256;

    /// Buffer size of the outcome channel between workers and the aggregator
    pub const OUTCOME_CHANNEL_SIZE: usize = 256;
}

/// Failure log and summary reporting
pub mod report {
    /// Default failure log path
    pub const DEFAULT_LOG_FILE: &str = "download_failures.log";

    /// Identifier prefix for tiles that have no URL in their region's map
    pub const MISSING_URL_PREFIX: &str = "MISSING_URL:";

    /// Failure reason recorded for missing tiles
    pub const MISSING_URL_REASON: &str = "not found";

    /// Number of tasks listed by a dry run
    pub const DRY_RUN_PREVIEW: usize = 10;
}

/// Configuration file discovery
pub mod config {
    /// Project-local configuration file name
    pub const LOCAL_CONFIG_FILE: &str = "dem-fetcher.toml";

    /// Directory under the user config dir
    pub const CONFIG_DIR_NAME: &str = "dem-fetcher";

    /// File name under the user config dir
    pub const CONFIG_FILE_NAME: &str = "config.toml";
}

// Re-export commonly used constants for convenience
pub use files::{CHUNK_SIZE, STAGING_SUFFIX};
pub use http::USER_AGENT;
pub use report::DEFAULT_LOG_FILE;
pub use workers::DEFAULT_WORKER_COUNT;
