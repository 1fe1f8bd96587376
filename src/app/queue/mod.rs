//! Work queue shared by the download workers
//!
//! Tasks are submitted up front and claimed first-in first-out by whichever
//! worker asks next, so no worker waits on a specific task.
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use dem_fetcher::app::models::DownloadTask;
//! use dem_fetcher::app::queue::WorkQueue;
//!
//! # async fn example() {
//! let queue = WorkQueue::new();
//! queue
//!     .add_work(DownloadTask::new(
//!         "Alpha.1",
//!         "http://host/tile_001.tif",
//!         PathBuf::from("dataset/train/dsm/Alpha1_tile_001.tif"),
//!     ))
//!     .await;
//!
//! while let Some(work) = queue.get_next_work().await {
//!     println!("claimed {}", work.task.url);
//! }
//! # }
//! ```

pub mod core;
pub mod types;

pub use self::core::WorkQueue;
pub use types::{QueueStats, WorkInfo};
