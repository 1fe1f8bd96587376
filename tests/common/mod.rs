//! Shared fixtures for integration tests.

#![allow(dead_code)]

pub mod tile_server;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dem_fetcher::app::{ClientConfig, CoordinatorConfig};

/// Write one region's URL list and split lists under `<source_root>/<type_dir>/<region>/`
///
/// `splits` pairs a split-list filename with its file content.
pub fn write_region(
    source_root: &Path,
    type_dir: &str,
    region: &str,
    urls: &[String],
    splits: &[(&str, &str)],
) -> PathBuf {
    let dir = source_root.join(type_dir).join(region);
    fs::create_dir_all(&dir).unwrap();

    let mut url_list = String::new();
    for url in urls {
        url_list.push_str(url);
        url_list.push('\n');
    }
    fs::write(dir.join("urls.csv"), url_list).unwrap();

    for (file_name, content) in splits {
        fs::write(dir.join(file_name), content).unwrap();
    }

    dir
}

/// Client with short timeouts for local servers
pub fn test_client_config() -> ClientConfig {
    ClientConfig::default()
        .with_probe_timeout(Duration::from_secs(5))
        .with_download_timeout(Duration::from_secs(5))
}

/// Coordinator writing its failure log to `log_path`, without a progress bar
pub fn test_coordinator_config(log_path: &Path) -> CoordinatorConfig {
    CoordinatorConfig::default()
        .with_worker_count(4)
        .with_failure_log(log_path)
        .with_progress_bar(false)
}

/// All files below `root`, recursively
pub fn files_under(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                found.push(path);
            }
        }
    }
    found.sort();
    found
}

/// True if any `.part` staging file remains below `root`
pub fn has_staging_files(root: &Path) -> bool {
    files_under(root)
        .iter()
        .any(|path| path.to_string_lossy().ends_with(".part"))
}
