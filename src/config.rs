//! Configuration management for DEM Fetcher
//!
//! Settings come from three layers: built-in defaults, an optional TOML file
//! and command-line flags, each overriding the one before. The file is taken
//! from `--config` when given, otherwise from `./dem-fetcher.toml` or the
//! user config directory.
//!
//! ```toml
//! [paths]
//! source_root = "dataset"
//! output_root = "dataset"
//! log_file = "download_failures.log"
//!
//! [client]
//! probe_timeout_secs = 30
//! download_timeout_secs = 60
//!
//! [workers]
//! worker_count = 8
//!
//! [logging]
//! level = "warn"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::app::{ClientConfig, WorkerConfig};
use crate::constants::{config, files, http, layout, report, workers};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Input and output locations
    pub paths: PathsConfig,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Worker pool settings
    pub workers: WorkersConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// File this configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Input and output locations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding `DSMs/` and `DTMs/`
    pub source_root: PathBuf,
    /// Directory receiving `<split>/<dsm|dtm>/` trees
    pub output_root: PathBuf,
    /// Failure log location
    pub log_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from(layout::DEFAULT_SOURCE_ROOT),
            output_root: PathBuf::from(layout::DEFAULT_OUTPUT_ROOT),
            log_file: PathBuf::from(report::DEFAULT_LOG_FILE),
        }
    }
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Override for the User-Agent header
    pub user_agent: Option<String>,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// HEAD probe timeout in seconds
    pub probe_timeout_secs: u64,
    /// GET send and per-read timeout in seconds
    pub download_timeout_secs: u64,
    /// Connection pool idle timeout in seconds (None = no timeout)
    pub pool_idle_timeout_secs: Option<u64>,
    /// TCP nodelay setting
    pub tcp_nodelay: bool,
    /// Maximum redirects to follow
    pub max_redirects: usize,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            user_agent: None,
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            probe_timeout_secs: http::PROBE_TIMEOUT.as_secs(),
            download_timeout_secs: http::DOWNLOAD_TIMEOUT.as_secs(),
            pool_idle_timeout_secs: Some(http::POOL_IDLE_TIMEOUT.as_secs()),
            tcp_nodelay: true,
            max_redirects: http::MAX_REDIRECTS,
        }
    }
}

/// TOML-friendly worker configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkersConfigToml {
    /// Number of concurrent workers
    pub worker_count: usize,
    /// Write buffer size in bytes
    pub chunk_size: usize,
    /// Show the progress bar
    pub progress_bar: bool,
}

impl Default for WorkersConfigToml {
    fn default() -> Self {
        Self {
            worker_count: workers::DEFAULT_WORKER_COUNT,
            chunk_size: files::CHUNK_SIZE,
            progress_bar: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given (error, warn, info, debug, trace)
    pub level: Option<String>,
}

impl AppConfig {
    /// Load configuration from the explicit file or the first one discovered
    ///
    /// An explicit file that does not exist is an error; finding no file in
    /// the standard locations just yields the defaults.
    pub async fn load(config_file_override: Option<&Path>) -> ConfigResult<Self> {
        let path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                    });
                }
                Some(path.to_path_buf())
            }
            None => Self::find_config_file(),
        };

        match path {
            Some(path) => Self::load_from_file(&path).await,
            None => Ok(Self::default()),
        }
    }

    /// Find configuration file in standard locations
    pub fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(config::LOCAL_CONFIG_FILE)];
        if let Some(path) = Self::default_config_path() {
            search_paths.push(path);
        }

        search_paths.into_iter().find(|path| path.is_file())
    }

    /// The per-user config file location, if the platform has one
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(config::CONFIG_DIR_NAME).join(config::CONFIG_FILE_NAME))
    }

    /// Load and validate configuration from a TOML file
    pub async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config: AppConfig =
            toml::from_str(&content).map_err(|source| ConfigError::InvalidFormat {
                path: path.to_path_buf(),
                source,
            })?;
        config.source = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Check values that serde alone cannot
    pub fn validate(&self) -> ConfigResult<()> {
        self.client_config().validate()?;
        self.worker_config().validate()?;
        self.log_level()?;
        Ok(())
    }

    /// Runtime client configuration
    pub fn client_config(&self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            user_agent: self.client.user_agent.clone().unwrap_or(defaults.user_agent),
            connect_timeout: Duration::from_secs(self.client.connect_timeout_secs),
            probe_timeout: Duration::from_secs(self.client.probe_timeout_secs),
            download_timeout: Duration::from_secs(self.client.download_timeout_secs),
            pool_idle_timeout: self.client.pool_idle_timeout_secs.map(Duration::from_secs),
            tcp_nodelay: self.client.tcp_nodelay,
            max_redirects: self.client.max_redirects,
        }
    }

    /// Runtime worker configuration
    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            worker_count: self.workers.worker_count,
            chunk_size: self.workers.chunk_size,
        }
    }

    /// Configured log level, if any
    pub fn log_level(&self) -> ConfigResult<Option<Level>> {
        self.logging
            .level
            .as_deref()
            .map(|level| {
                level.parse::<Level>().map_err(|_| ConfigError::InvalidValue {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: "Expected one of error, warn, info, debug, trace".to_string(),
                })
            })
            .transpose()
    }
}
