//! Core download worker implementation
//!
//! A worker claims tasks from the shared queue until it is drained. For each
//! task it probes the remote size, skips tiles that are already complete,
//! streams everything else into a staging file and promotes the staging file
//! only after the size check passes. Every outcome, including failures, is
//! reported to the coordinator as data.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::config::WorkerConfig;
use super::types::{TaskOutcome, WorkerEvent};
use crate::app::client::TileClient;
use crate::app::models::{DownloadTask, FailureRecord};
use crate::app::queue::WorkQueue;
use crate::constants::files;
use crate::errors::{DownloadError, DownloadResult};

/// Individual download worker
#[derive(Debug)]
pub struct DownloadWorker {
    /// Unique worker identifier
    id: u32,
    /// Worker configuration
    config: WorkerConfig,
    /// Shared work queue
    queue: Arc<WorkQueue>,
    /// Shared tile client
    client: Arc<TileClient>,
    /// Outcome reporting channel
    outcome_tx: mpsc::Sender<WorkerEvent>,
}

impl DownloadWorker {
    /// Create a new download worker
    pub fn new(
        id: u32,
        config: WorkerConfig,
        queue: Arc<WorkQueue>,
        client: Arc<TileClient>,
        outcome_tx: mpsc::Sender<WorkerEvent>,
    ) -> Self {
        Self {
            id,
            config,
            queue,
            client,
            outcome_tx,
        }
    }

    /// Process tasks until the queue is drained
    ///
    /// Returns the number of tasks processed.
    pub async fn run(self) -> usize {
        debug!("Worker {} starting", self.id);
        let mut processed = 0;

        while let Some(work) = self.queue.get_next_work().await {
            let outcome = self.process(&work.task).await;
            processed += 1;

            let event = WorkerEvent {
                worker_id: self.id,
                task: work.task,
                outcome,
            };
            if self.outcome_tx.send(event).await.is_err() {
                // Aggregator gone; nothing left to report to
                warn!("Worker {} outcome channel closed, stopping", self.id);
                break;
            }
        }

        debug!("Worker {} finished after {} tasks", self.id, processed);
        processed
    }

    /// Ensure one task's destination is complete, or describe why it is not
    ///
    /// Never returns an error: failures come back as `TaskOutcome::Failed`.
    pub async fn process(&self, task: &DownloadTask) -> TaskOutcome {
        match self.try_process(task).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Worker {} failed {}: {}", self.id, task.url, e);
                TaskOutcome::Failed(FailureRecord::for_task(task, e.to_string()))
            }
        }
    }

    async fn try_process(&self, task: &DownloadTask) -> DownloadResult<TaskOutcome> {
        if let Some(parent) = task.destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let remote_size = self.client.probe_remote_size(&task.url).await;

        if is_already_complete(&task.destination, remote_size).await {
            debug!(
                "Worker {} skipping complete tile {}",
                self.id,
                task.destination.display()
            );
            return Ok(TaskOutcome::Skipped);
        }

        let staging_path = task.staging_path();
        remove_if_exists(&staging_path).await?;

        match self.transfer(task, &staging_path, remote_size).await {
            Ok(bytes) => {
                info!(
                    "Worker {} downloaded {} ({} bytes)",
                    self.id,
                    task.destination.display(),
                    bytes
                );
                Ok(TaskOutcome::Downloaded { bytes })
            }
            Err(e) => {
                if let Err(cleanup) = remove_if_exists(&staging_path).await {
                    warn!(
                        "Worker {} could not remove {}: {}",
                        self.id,
                        staging_path.display(),
                        cleanup
                    );
                }
                Err(e)
            }
        }
    }

    /// Stream, verify and promote; the staging file is the caller's to clean up
    async fn transfer(
        &self,
        task: &DownloadTask,
        staging_path: &Path,
        remote_size: Option<u64>,
    ) -> DownloadResult<u64> {
        self.client
            .download_to(&task.url, staging_path, self.config.chunk_size)
            .await?;

        let actual = tokio::fs::metadata(staging_path).await?.len();
        if let Some(expected) = remote_size {
            if actual != expected {
                return Err(DownloadError::SizeMismatch { expected, actual });
            }
        }

        tokio::fs::rename(staging_path, &task.destination)
            .await
            .map_err(|source| DownloadError::AtomicOperationFailed {
                temp_path: staging_path.to_path_buf(),
                final_path: task.destination.clone(),
                source,
            })?;

        Ok(actual)
    }
}

/// Resumability rule: a destination counts as complete when it exists and
/// either matches the known remote size or, with the remote size unknown, is
/// non-empty
///
/// A damaged file whose size happens to match is accepted as complete.
pub async fn is_already_complete(destination: &Path, remote_size: Option<u64>) -> bool {
    let Ok(metadata) = tokio::fs::metadata(destination).await else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    let local_size = metadata.len();
    match remote_size {
        Some(expected) => local_size == expected,
        None => local_size > 0,
    }
}

/// Remove numbered staging files (`<dest>.<n>.part`) left next to `destination`
///
/// Must run before any worker starts on `destination`. Returns the number of
/// files removed; a missing parent directory removes nothing.
pub async fn remove_numbered_staging(destination: &Path) -> std::io::Result<usize> {
    let (Some(parent), Some(file_name)) = (
        destination.parent(),
        destination.file_name().and_then(|name| name.to_str()),
    ) else {
        return Ok(0);
    };

    let mut entries = match tokio::fs::read_dir(parent).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if is_numbered_staging_name(name, file_name) {
            remove_if_exists(&entry.path()).await?;
            removed += 1;
        }
    }
    Ok(removed)
}

fn is_numbered_staging_name(name: &str, destination_name: &str) -> bool {
    name.strip_prefix(destination_name)
        .and_then(|rest| rest.strip_prefix('.'))
        .and_then(|rest| rest.strip_suffix(files::STAGING_SUFFIX))
        .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
}

async fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Builder for DownloadWorker
#[derive(Debug, Default)]
pub struct DownloadWorkerBuilder {
    id: Option<u32>,
    config: Option<WorkerConfig>,
    queue: Option<Arc<WorkQueue>>,
    client: Option<Arc<TileClient>>,
    outcome_tx: Option<mpsc::Sender<WorkerEvent>>,
}

impl DownloadWorkerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn config(mut self, config: WorkerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn queue(mut self, queue: Arc<WorkQueue>) -> Self {
        self.queue = Some(queue);
        self
    }

    pub fn client(mut self, client: Arc<TileClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn outcome_channel(mut self, outcome_tx: mpsc::Sender<WorkerEvent>) -> Self {
        self.outcome_tx = Some(outcome_tx);
        self
    }

    /// Build the worker; `None` if the queue, client or channel is missing
    pub fn build(self) -> Option<DownloadWorker> {
        Some(DownloadWorker::new(
            self.id.unwrap_or(0),
            self.config.unwrap_or_default(),
            self.queue?,
            self.client?,
            self.outcome_tx?,
        ))
    }
}
