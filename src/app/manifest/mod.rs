//! Manifest discovery and resolution
//!
//! Turns the per-region manifest folders of a DSM/DTM dataset into a flat list
//! of download tasks. Each region folder holds one URL list (`*.csv`, one URL
//! per line) and any number of split lists (`*.txt`) whose file names mark them
//! as train, val or test.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::path::Path;
//! use dem_fetcher::app::manifest::resolve_tasks;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolution = resolve_tasks(Path::new("dataset"), Path::new("dataset")).await?;
//! println!(
//!     "{} tasks, {} tiles without a URL",
//!     resolution.tasks.len(),
//!     resolution.missing.len()
//! );
//! # Ok(())
//! # }
//! ```

pub mod resolver;
pub mod url_map;

pub use resolver::{resolve_tasks, tile_names, Resolution};
pub use url_map::UrlMap;
