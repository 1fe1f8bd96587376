//! Core application logic for DEM Fetcher
//!
//! This module contains the resolver that turns the per-region manifests into
//! download tasks, the HTTP client, the work queue, the download workers and
//! the coordinator that ties them together.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::path::Path;
//! use dem_fetcher::app::resolve_tasks;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolution = resolve_tasks(Path::new("dataset"), Path::new("dataset")).await?;
//!
//! for task in &resolution.tasks {
//!     println!("{} -> {}", task.url, task.destination.display());
//! }
//! for missing in &resolution.missing {
//!     println!("no URL for {} in {}", missing.tile_name, missing.region);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod coordinator;
pub mod manifest;
pub mod models;
pub mod queue;
pub mod worker;

// Re-export main public API
pub use client::{ClientConfig, TileClient};
pub use coordinator::{Coordinator, CoordinatorConfig, DownloadStats, SessionResult};
pub use manifest::{resolve_tasks, Resolution, UrlMap};
pub use models::{DatasetKind, DownloadTask, FailureRecord, MissingTile, Split};
pub use queue::{QueueStats, WorkInfo, WorkQueue};
pub use worker::{TaskOutcome, WorkerConfig, WorkerPool};
