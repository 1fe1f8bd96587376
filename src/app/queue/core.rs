//! Core work queue implementation
//!
//! All tasks are submitted up front and workers claim them one at a time.
//! There is no priority ordering, no retry and no completion tracking: a
//! claimed task belongs to its worker until the worker reports an outcome to
//! the coordinator.

use std::collections::VecDeque;

use tokio::sync::Mutex;
use tracing::debug;

use super::types::{QueueStats, WorkInfo};
use crate::app::models::DownloadTask;

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<WorkInfo>,
    next_id: usize,
    claimed: usize,
}

/// Shared queue of download tasks
#[derive(Debug, Default)]
pub struct WorkQueue {
    state: Mutex<QueueState>,
}

impl WorkQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single task
    pub async fn add_work(&self, task: DownloadTask) -> usize {
        self.add_work_bulk(std::iter::once(task)).await
    }

    /// Add many tasks under one lock acquisition, returning how many were added
    pub async fn add_work_bulk(&self, tasks: impl IntoIterator<Item = DownloadTask>) -> usize {
        let mut state = self.state.lock().await;
        let mut added = 0;
        for task in tasks {
            let work_id = state.next_id;
            state.next_id += 1;
            state.pending.push_back(WorkInfo { work_id, task });
            added += 1;
        }
        debug!("Queued {} tasks ({} pending)", added, state.pending.len());
        added
    }

    /// Claim the next task, or `None` when the queue is drained
    pub async fn get_next_work(&self) -> Option<WorkInfo> {
        let mut state = self.state.lock().await;
        let work = state.pending.pop_front()?;
        state.claimed += 1;
        Some(work)
    }

    /// Current counters
    pub async fn stats(&self) -> QueueStats {
        let state = self.state.lock().await;
        QueueStats {
            total_added: state.next_id,
            pending_count: state.pending.len(),
            claimed_count: state.claimed,
        }
    }
}
