//! Worker type definitions

use serde::{Deserialize, Serialize};

use crate::app::models::{DownloadTask, FailureRecord};

/// Result of processing one download task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskOutcome {
    /// Destination was already complete; nothing was transferred
    Skipped,
    /// Tile was transferred, verified and promoted to its destination
    Downloaded { bytes: u64 },
    /// Task failed; the record goes to the failure log
    Failed(FailureRecord),
}

impl TaskOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, TaskOutcome::Failed(_))
    }
}

/// Outcome report sent from a worker to the coordinator's aggregator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerEvent {
    /// ID of the reporting worker
    pub worker_id: u32,
    /// Task that was processed
    pub task: DownloadTask,
    /// What happened to it
    pub outcome: TaskOutcome,
}
