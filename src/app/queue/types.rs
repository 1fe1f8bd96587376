//! Queue type definitions

use serde::{Deserialize, Serialize};

use crate::app::models::DownloadTask;

/// A task claimed from the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkInfo {
    /// Position of the task in submission order
    pub work_id: usize,
    /// The task itself
    pub task: DownloadTask,
}

impl WorkInfo {
    pub fn work_id(&self) -> usize {
        self.work_id
    }
}

/// Snapshot of queue counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Tasks ever added
    pub total_added: usize,
    /// Tasks not yet claimed
    pub pending_count: usize,
    /// Tasks handed out to workers
    pub claimed_count: usize,
}

impl QueueStats {
    /// True once every added task has been claimed
    pub fn is_drained(&self) -> bool {
        self.pending_count == 0
    }
}
