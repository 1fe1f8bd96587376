//! Worker configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{files, workers};
use crate::errors::{ConfigError, ConfigResult};

/// Configuration for download workers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Number of concurrent workers to spawn
    pub worker_count: usize,
    /// Write buffer size used when streaming a body to disk
    pub chunk_size: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            worker_count: workers::DEFAULT_WORKER_COUNT,
            chunk_size: files::CHUNK_SIZE,
        }
    }
}

impl WorkerConfig {
    /// Set the worker count
    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count;
        self
    }

    /// Validate configuration values and return errors for invalid settings
    pub fn validate(&self) -> ConfigResult<()> {
        if self.worker_count == 0 || self.worker_count > workers::MAX_WORKER_COUNT {
            return Err(ConfigError::InvalidValue {
                field: "worker_count".to_string(),
                value: self.worker_count.to_string(),
                reason: format!("Must be between 1 and {}", workers::MAX_WORKER_COUNT),
            });
        }

        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chunk_size".to_string(),
                value: "0".to_string(),
                reason: "Chunk size must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
