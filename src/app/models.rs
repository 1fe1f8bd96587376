//! Data models for tile download work
//!
//! This module defines the core data structures shared by the resolver, the
//! workers and the coordinator: dataset kinds, splits, download tasks and the
//! failure records that make up the failure log.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{files, layout, report};

/// Kind of elevation model a region folder holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetKind {
    /// Digital surface model
    Dsm,
    /// Digital terrain model
    Dtm,
}

impl DatasetKind {
    /// All kinds, in the order their source folders are scanned
    pub const ALL: [DatasetKind; 2] = [DatasetKind::Dsm, DatasetKind::Dtm];

    /// Folder under the source root holding this kind's regions
    pub fn source_dir_name(self) -> &'static str {
        match self {
            DatasetKind::Dsm => layout::DSM_SOURCE_DIR,
            DatasetKind::Dtm => layout::DTM_SOURCE_DIR,
        }
    }

    /// Folder under `<output_root>/<split>` receiving this kind's tiles
    pub fn output_dir_name(self) -> &'static str {
        match self {
            DatasetKind::Dsm => layout::DSM_OUTPUT_DIR,
            DatasetKind::Dtm => layout::DTM_OUTPUT_DIR,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.output_dir_name())
    }
}

/// Dataset partition a tile belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    /// Classify a split list by its file name
    ///
    /// Matching is a case-insensitive substring search checked in priority
    /// order train, val, test. A name such as `train_val.txt` is therefore a
    /// train list. Returns `None` when no marker is present.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let lowered = file_name.to_lowercase();
        [Split::Train, Split::Val, Split::Test]
            .into_iter()
            .find(|split| lowered.contains(split.as_str()))
    }

    /// Lowercase name used both as the file-name marker and output folder
    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strip characters that must not appear in the region prefix of output names
pub fn sanitize_region_name(region: &str) -> String {
    region.replace(layout::REGION_STRIP_CHARS, "")
}

/// Tile filename for a URL: everything after the final `/`
pub fn tile_name_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Destination path of a tile inside the output layout
///
/// `<output_root>/<split>/<kind>/<sanitized_region>_<tile_name>`
pub fn destination_path(
    output_root: &Path,
    split: Split,
    kind: DatasetKind,
    region: &str,
    tile_name: &str,
) -> PathBuf {
    output_root
        .join(split.as_str())
        .join(kind.output_dir_name())
        .join(format!("{}_{}", sanitize_region_name(region), tile_name))
}

/// A single unit of download work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadTask {
    /// Region the tile was listed under (unsanitized)
    pub region: String,
    /// Source URL
    pub url: String,
    /// Final location of the tile
    pub destination: PathBuf,
    /// Number of earlier tasks in this run sharing the same destination
    pub duplicate_index: usize,
}

impl DownloadTask {
    /// Create a task with no earlier duplicate
    pub fn new(region: impl Into<String>, url: impl Into<String>, destination: PathBuf) -> Self {
        Self {
            region: region.into(),
            url: url.into(),
            destination,
            duplicate_index: 0,
        }
    }

    /// Path the body is streamed to before being renamed onto the destination
    ///
    /// Repeated destinations get a numbered staging file so concurrent
    /// duplicates never write into the same file.
    pub fn staging_path(&self) -> PathBuf {
        let mut staged = self.destination.clone().into_os_string();
        if self.duplicate_index > 0 {
            staged.push(format!(".{}", self.duplicate_index));
        }
        staged.push(files::STAGING_SUFFIX);
        PathBuf::from(staged)
    }
}

/// Tile referenced by a split list but absent from its region's URL map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingTile {
    pub region: String,
    pub tile_name: String,
}

impl MissingTile {
    pub fn new(region: impl Into<String>, tile_name: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            tile_name: tile_name.into(),
        }
    }
}

/// One line of the failure log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Region the failed tile belongs to
    pub region: String,
    /// Source URL, or `MISSING_URL:<tile>` for unresolved tiles
    pub identifier: String,
    /// Human-readable reason
    pub reason: String,
}

impl FailureRecord {
    /// Failure of a download task
    pub fn for_task(task: &DownloadTask, reason: impl Into<String>) -> Self {
        Self {
            region: task.region.clone(),
            identifier: task.url.clone(),
            reason: reason.into(),
        }
    }

    /// Failure recorded for a tile without a URL
    pub fn missing(missing: &MissingTile) -> Self {
        Self {
            region: missing.region.clone(),
            identifier: format!("{}{}", report::MISSING_URL_PREFIX, missing.tile_name),
            reason: report::MISSING_URL_REASON.to_string(),
        }
    }

    /// Tab-separated log line, without the trailing newline
    pub fn to_log_line(&self) -> String {
        format!("{}\t{}\t{}", self.region, self.identifier, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_classification_priority() {
        assert_eq!(Split::from_file_name("train.txt"), Some(Split::Train));
        assert_eq!(Split::from_file_name("Region_VAL_list.TXT"), Some(Split::Val));
        assert_eq!(Split::from_file_name("test_tiles.txt"), Some(Split::Test));
        assert_eq!(Split::from_file_name("train_val.txt"), Some(Split::Train));
        assert_eq!(Split::from_file_name("val_test.txt"), Some(Split::Val));
        assert_eq!(Split::from_file_name("readme.txt"), None);
    }

    #[test]
    fn test_region_sanitization() {
        assert_eq!(sanitize_region_name("Alpha.1"), "Alpha1");
        assert_eq!(sanitize_region_name("a.b.c"), "abc");
        assert_eq!(sanitize_region_name("plain"), "plain");
    }

    #[test]
    fn test_tile_name_from_url() {
        assert_eq!(tile_name_from_url("http://host/a/b/tile_001.tif"), "tile_001.tif");
        assert_eq!(tile_name_from_url("tile.tif"), "tile.tif");
        assert_eq!(tile_name_from_url("http://host/dir/"), "");
    }

    #[test]
    fn test_destination_layout() {
        let path = destination_path(
            Path::new("/out"),
            Split::Train,
            DatasetKind::Dsm,
            "Alpha.1",
            "tile_001.tif",
        );
        assert_eq!(path, PathBuf::from("/out/train/dsm/Alpha1_tile_001.tif"));

        let path = destination_path(
            Path::new("/out"),
            Split::Test,
            DatasetKind::Dtm,
            "Beta",
            "x.tif",
        );
        assert_eq!(path, PathBuf::from("/out/test/dtm/Beta_x.tif"));
    }

    #[test]
    fn test_staging_paths() {
        let mut task = DownloadTask::new("r", "http://h/t.tif", PathBuf::from("/o/r_t.tif"));
        assert_eq!(task.staging_path(), PathBuf::from("/o/r_t.tif.part"));

        task.duplicate_index = 2;
        assert_eq!(task.staging_path(), PathBuf::from("/o/r_t.tif.2.part"));
    }

    #[test]
    fn test_failure_log_lines() {
        let missing = MissingTile::new("Alpha.1", "tile_999.tif");
        assert_eq!(
            FailureRecord::missing(&missing).to_log_line(),
            "Alpha.1\tMISSING_URL:tile_999.tif\tnot found"
        );

        let task = DownloadTask::new("Beta", "http://h/b.tif", PathBuf::from("/o/Beta_b.tif"));
        let record = FailureRecord::for_task(&task, "HTTP error 404");
        assert_eq!(record.to_log_line(), "Beta\thttp://h/b.tif\tHTTP error 404");
    }
}
