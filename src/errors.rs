//! Error types for DEM Fetcher
//!
//! Errors fall into two groups. Resolution and configuration errors abort the
//! run before any download starts. Download errors are caught by the worker and
//! turned into failure records, so their `Display` text is what ends up in the
//! failure log.

use std::path::PathBuf;

use thiserror::Error;

/// Download and HTTP client errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request error
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// I/O error during file operations
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Request or body read timed out
    #[error("timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Invalid URL provided
    #[error("invalid URL {url}: {error}")]
    InvalidUrl { url: String, error: String },

    /// Server returned a non-success status
    #[error("HTTP error {status}")]
    ServerError { status: u16 },

    /// Downloaded byte count differs from the probed remote size
    #[error("size mismatch: expected {expected} got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    /// Staging file could not be promoted to the destination
    #[error("could not rename {temp_path} to {final_path}: {source}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
        source: std::io::Error,
    },
}

/// Manifest discovery and parsing errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Directory listing failed
    #[error("Failed to list directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Manifest file could not be read
    #[error("Failed to read manifest {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format in {path}: {source}")]
    InvalidFormat {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// HTTP client could not be constructed from the configuration
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Failure log and summary reporting errors
#[derive(Error, Debug)]
pub enum ReportError {
    /// Failure log could not be written
    #[error("Failed to write failure log {path}: {source}")]
    WriteLog {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Stale failure log could not be removed
    #[error("Failed to remove stale failure log {path}: {source}")]
    RemoveLog {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Manifest error
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Report error
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Download(_) => "download",
            AppError::Manifest(_) => "manifest",
            AppError::Config(_) => "config",
            AppError::Report(_) => "report",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// Manifest result type alias
pub type ManifestResult<T> = std::result::Result<T, ManifestError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Report result type alias
pub type ReportResult<T> = std::result::Result<T, ReportError>;
