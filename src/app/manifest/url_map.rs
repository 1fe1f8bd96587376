//! Per-region URL list parsing
//!
//! A region's URL list holds one bare URL per line. The tile filename is the
//! last `/`-delimited segment of the URL; when two lines produce the same
//! filename the later line wins.

use std::collections::HashMap;
use std::path::Path;

use crate::app::models::tile_name_from_url;
use crate::errors::{ManifestError, ManifestResult};

/// Mapping from tile filename to its source URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlMap {
    entries: HashMap<String, String>,
}

impl UrlMap {
    /// Build a map from the text of a URL list
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();
        for line in content.lines() {
            let url = line.trim();
            if url.is_empty() {
                continue;
            }
            entries.insert(tile_name_from_url(url).to_string(), url.to_string());
        }
        Self { entries }
    }

    /// Read and parse a URL list file
    pub async fn load(path: &Path) -> ManifestResult<Self> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ManifestError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                })?;
        Ok(Self::parse(&content))
    }

    /// URL for a tile, if listed
    pub fn get(&self, tile_name: &str) -> Option<&str> {
        self.entries.get(tile_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
