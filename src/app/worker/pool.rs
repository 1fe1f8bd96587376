//! Worker pool management
//!
//! The pool spawns a fixed number of workers over one shared queue and waits
//! for all of them to drain it. Workers stop on their own once the queue is
//! empty, so there is no shutdown signalling.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::config::WorkerConfig;
use super::core::DownloadWorkerBuilder;
use super::types::WorkerEvent;
use crate::app::client::TileClient;
use crate::app::queue::WorkQueue;
use crate::errors::{AppError, Result};

/// Pool for managing multiple download workers
#[derive(Debug)]
pub struct WorkerPool {
    /// Worker configuration
    config: WorkerConfig,
    /// Shared work queue
    queue: Arc<WorkQueue>,
    /// Shared tile client
    client: Arc<TileClient>,
    /// Worker task handles
    worker_handles: Vec<JoinHandle<usize>>,
}

impl WorkerPool {
    /// Create a new worker pool
    pub fn new(config: WorkerConfig, queue: Arc<WorkQueue>, client: Arc<TileClient>) -> Self {
        Self {
            config,
            queue,
            client,
            worker_handles: Vec::new(),
        }
    }

    /// Spawn all workers, each reporting on a clone of `outcome_tx`
    ///
    /// The pool keeps no sender of its own: the channel closes once the last
    /// worker finishes.
    pub fn start(&mut self, outcome_tx: mpsc::Sender<WorkerEvent>) -> Result<()> {
        if !self.worker_handles.is_empty() {
            return Err(AppError::generic("Worker pool already started"));
        }
        self.config.validate()?;

        info!("Starting {} workers", self.config.worker_count);

        for worker_id in 0..self.config.worker_count {
            let worker = DownloadWorkerBuilder::new()
                .id(worker_id as u32)
                .config(self.config.clone())
                .queue(self.queue.clone())
                .client(self.client.clone())
                .outcome_channel(outcome_tx.clone())
                .build()
                .ok_or_else(|| AppError::generic("Incomplete worker configuration"))?;

            self.worker_handles
                .push(tokio::spawn(async move { worker.run().await }));
        }

        Ok(())
    }

    /// Wait for every worker to finish, returning the number of tasks processed
    pub async fn wait(&mut self) -> usize {
        let mut processed = 0;
        for (worker_id, handle) in self.worker_handles.drain(..).enumerate() {
            match handle.await {
                Ok(count) => processed += count,
                Err(e) => warn!("Worker {} task failed to join: {}", worker_id, e),
            }
        }
        debug!("All workers finished, {} tasks processed", processed);
        processed
    }

    /// Number of spawned workers still being tracked
    pub fn active_workers(&self) -> usize {
        self.worker_handles.len()
    }
}
