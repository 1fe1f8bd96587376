//! Configuration structures for the download coordinator

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::app::worker::WorkerConfig;
use crate::constants::report;
use crate::errors::{ConfigError, ConfigResult};

/// Configuration for the download coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Worker configuration
    pub worker_config: WorkerConfig,
    /// Where failures are written after a run that had any
    pub failure_log: PathBuf,
    /// Enable real-time progress bar display
    pub enable_progress_bar: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            worker_config: WorkerConfig::default(),
            failure_log: PathBuf::from(report::DEFAULT_LOG_FILE),
            enable_progress_bar: true,
        }
    }
}

impl CoordinatorConfig {
    /// Set the number of concurrent workers
    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_config.worker_count = count;
        self
    }

    /// Set the failure log location
    pub fn with_failure_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.failure_log = path.into();
        self
    }

    /// Enable or disable the progress bar
    pub fn with_progress_bar(mut self, enabled: bool) -> Self {
        self.enable_progress_bar = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        self.worker_config.validate()?;

        if self.failure_log.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "failure_log".to_string(),
                value: String::new(),
                reason: "Failure log path cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}
