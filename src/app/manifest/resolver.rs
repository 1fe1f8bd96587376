//! Resolution of region manifests into download tasks
//!
//! Walks `<source_root>/{DSMs,DTMs}/<region>/`, pairs each region's split lists
//! with its URL list and emits one task per resolvable tile line. Tiles named
//! in a split list but absent from the URL list are reported as missing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::url_map::UrlMap;
use crate::app::models::{destination_path, DatasetKind, DownloadTask, MissingTile, Split};
use crate::constants::layout;
use crate::errors::{ManifestError, ManifestResult};

/// Outcome of resolving all regions under a source root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Download tasks, in resolution order
    pub tasks: Vec<DownloadTask>,
    /// Tiles referenced by a split list with no URL, in resolution order
    pub missing: Vec<MissingTile>,
}

impl Resolution {
    /// True when nothing was resolved, neither tasks nor missing tiles
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.missing.is_empty()
    }
}

/// Resolve every region under `source_root` into tasks targeting `output_root`
pub async fn resolve_tasks(source_root: &Path, output_root: &Path) -> ManifestResult<Resolution> {
    let mut resolution = Resolution::default();

    for kind in DatasetKind::ALL {
        let kind_root = source_root.join(kind.source_dir_name());
        if !is_dir(&kind_root).await {
            debug!("No {} folder at {}", kind, kind_root.display());
            continue;
        }

        for region_dir in list_sorted(&kind_root, |entry| entry.is_dir).await? {
            resolve_region(&region_dir.path, &region_dir.name, kind, output_root, &mut resolution)
                .await?;
        }
    }

    if resolution.is_empty() {
        warn!(
            "No tasks resolved under {}; expected {}/ or {}/ region folders",
            source_root.display(),
            layout::DSM_SOURCE_DIR,
            layout::DTM_SOURCE_DIR
        );
    }

    mark_duplicate_destinations(&mut resolution.tasks);

    info!(
        "Resolved {} tasks and {} missing tiles from {}",
        resolution.tasks.len(),
        resolution.missing.len(),
        source_root.display()
    );
    Ok(resolution)
}

async fn resolve_region(
    region_path: &Path,
    region: &str,
    kind: DatasetKind,
    output_root: &Path,
    resolution: &mut Resolution,
) -> ManifestResult<()> {
    let url_lists = list_sorted(region_path, |entry| {
        !entry.is_dir && has_extension(&entry.name, layout::URL_LIST_EXTENSION)
    })
    .await?;

    let Some(url_list) = url_lists.first() else {
        debug!("Region {} ({}) has no URL list, skipping", region, kind);
        return Ok(());
    };
    if url_lists.len() > 1 {
        debug!(
            "Region {} has {} URL lists, using {}",
            region,
            url_lists.len(),
            url_list.name
        );
    }
    let url_map = UrlMap::load(&url_list.path).await?;

    let split_lists = list_sorted(region_path, |entry| {
        !entry.is_dir && has_extension(&entry.name, layout::SPLIT_LIST_EXTENSION)
    })
    .await?;

    for split_list in split_lists {
        let Some(split) = Split::from_file_name(&split_list.name) else {
            debug!("Ignoring unclassified list {}", split_list.path.display());
            continue;
        };

        let content = tokio::fs::read_to_string(&split_list.path)
            .await
            .map_err(|source| ManifestError::ReadFile {
                path: split_list.path.clone(),
                source,
            })?;

        let before = (resolution.tasks.len(), resolution.missing.len());
        for tile_name in tile_names(&content) {
            match url_map.get(tile_name) {
                Some(url) => resolution.tasks.push(DownloadTask::new(
                    region,
                    url,
                    destination_path(output_root, split, kind, region, tile_name),
                )),
                None => resolution.missing.push(MissingTile::new(region, tile_name)),
            }
        }
        debug!(
            "Region {} {} list {}: {} tasks, {} missing",
            region,
            split,
            split_list.name,
            resolution.tasks.len() - before.0,
            resolution.missing.len() - before.1
        );
    }

    Ok(())
}

/// Tile names listed in a split file: the first comma-delimited field of each
/// non-empty line
pub fn tile_names(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.split(',').next().unwrap_or(line))
}

/// Number every repeated destination so duplicates get their own staging file
fn mark_duplicate_destinations(tasks: &mut [DownloadTask]) {
    let mut seen: HashMap<PathBuf, usize> = HashMap::new();
    for task in tasks.iter_mut() {
        let count = seen.entry(task.destination.clone()).or_insert(0);
        task.duplicate_index = *count;
        if *count > 0 {
            debug!(
                "Duplicate destination {} (occurrence {})",
                task.destination.display(),
                *count + 1
            );
        }
        *count += 1;
    }
}

/// Case-insensitive `.<extension>` suffix match; a bare `.csv` counts too
fn has_extension(name: &str, extension: &str) -> bool {
    name.to_ascii_lowercase()
        .strip_suffix(&extension.to_ascii_lowercase())
        .is_some_and(|stem| stem.ends_with('.'))
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false)
}

struct DirEntryInfo {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// List a directory's entries matching `keep`, sorted by name
async fn list_sorted(
    dir: &Path,
    keep: impl Fn(&DirEntryInfo) -> bool,
) -> ManifestResult<Vec<DirEntryInfo>> {
    let read_dir_error = |source| ManifestError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    let mut reader = tokio::fs::read_dir(dir).await.map_err(read_dir_error)?;
    while let Some(entry) = reader.next_entry().await.map_err(read_dir_error)? {
        let path = entry.path();
        // Follows symlinks, so linked region folders count as regions
        let entry_is_dir = is_dir(&path).await;
        let info = DirEntryInfo {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            is_dir: entry_is_dir,
        };
        if keep(&info) {
            entries.push(info);
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
