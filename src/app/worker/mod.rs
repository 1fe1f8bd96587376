//! Download workers
//!
//! Workers pull tasks from the shared [`WorkQueue`](crate::app::queue::WorkQueue)
//! until it is empty. Each task is probed, skipped if already complete, or
//! streamed through a staging file that only becomes the destination after
//! its size checks out. Outcomes travel to the coordinator over a channel.
//!
//! # Module Organization
//!
//! - [`config`] - Worker count and streaming buffer size
//! - [`types`] - Task outcomes and worker events
//! - [`core`] - Single worker and the per-task download procedure
//! - [`pool`] - Spawning and joining a set of workers
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dem_fetcher::app::client::TileClient;
//! use dem_fetcher::app::queue::WorkQueue;
//! use dem_fetcher::app::worker::{WorkerConfig, WorkerPool};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(TileClient::new()?);
//! let queue = Arc::new(WorkQueue::new());
//!
//! let mut pool = WorkerPool::new(WorkerConfig::default(), queue, client);
//! let (outcome_tx, mut outcome_rx) = tokio::sync::mpsc::channel(64);
//! pool.start(outcome_tx)?;
//!
//! while let Some(event) = outcome_rx.recv().await {
//!     println!("worker {}: {:?}", event.worker_id, event.outcome);
//! }
//! pool.wait().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod pool;
pub mod types;

pub use self::core::{
    is_already_complete, remove_numbered_staging, DownloadWorker, DownloadWorkerBuilder,
};
pub use config::WorkerConfig;
pub use pool::WorkerPool;
pub use types::{TaskOutcome, WorkerEvent};
