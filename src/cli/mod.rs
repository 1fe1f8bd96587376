//! Command-line interface components
//!
//! This module contains CLI-specific code for the DEM Fetcher application:
//! argument parsing and the download command handler.

pub mod args;
pub mod commands;

pub use args::{Cli, DownloadArgs, GlobalArgs};
pub use commands::{handle_download, run_download, DownloadSettings};
