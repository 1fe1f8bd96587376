//! HTTP client for remote tile hosts
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: single-attempt HEAD/GET operations with timeouts
//! - `download`: streaming of response bodies into staging files

use std::path::Path;

use tracing::debug;
use url::Url;

use crate::errors::{ConfigResult, DownloadError, DownloadResult};

pub mod config;
pub mod download;
pub mod http;

pub use config::ClientConfig;

use download::DownloadHandler;
use http::HttpHandler;

/// HTTP client shared by all download workers
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct TileClient {
    http_handler: HttpHandler,
    config: ClientConfig,
}

impl TileClient {
    /// Creates a client with default configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the HTTP client cannot be built
    pub fn new() -> ConfigResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid or the HTTP
    /// client cannot be built
    pub fn with_config(config: ClientConfig) -> ConfigResult<Self> {
        config.validate()?;
        let client = config.build_http_client()?;
        debug!("Created tile client ({})", config.user_agent);
        Ok(Self {
            http_handler: HttpHandler::new(client),
            config,
        })
    }

    /// Expected byte size of a remote tile, or `None` when unknown
    ///
    /// Any failure while probing (bad URL, transport error, timeout,
    /// non-success status, missing header) yields `None`; probing never fails
    /// a download.
    pub async fn probe_remote_size(&self, url: &str) -> Option<u64> {
        let parsed = match parse_url(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Size probe skipped for {}: {}", url, e);
                return None;
            }
        };

        match self
            .http_handler
            .head_content_length(&parsed, self.config.probe_timeout)
            .await
        {
            Ok(length) => length,
            Err(e) => {
                debug!("Size probe failed for {}: {}", url, e);
                None
            }
        }
    }

    /// Streams the tile at `url` into `staging_path`, returning bytes written
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` for an invalid URL, transport failure, timeout,
    /// non-success status or write failure
    pub async fn download_to(
        &self,
        url: &str,
        staging_path: &Path,
        chunk_size: usize,
    ) -> DownloadResult<u64> {
        let parsed = parse_url(url)?;
        DownloadHandler::new(&self.http_handler, self.config.download_timeout, chunk_size)
            .download_to(&parsed, staging_path)
            .await
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

fn parse_url(url: &str) -> DownloadResult<Url> {
    Url::parse(url).map_err(|e| DownloadError::InvalidUrl {
        url: url.to_string(),
        error: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_client_creation() {
        let client = TileClient::new().unwrap();
        assert_eq!(client.config().probe_timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_probe_of_invalid_url_is_unknown() {
        let client = TileClient::new().unwrap();
        assert_eq!(client.probe_remote_size("not a url").await, None);
    }

    #[tokio::test]
    async fn test_probe_of_unreachable_host_is_unknown() {
        let config = ClientConfig::default().with_probe_timeout(Duration::from_secs(2));
        let client = TileClient::with_config(config).unwrap();
        assert_eq!(
            client.probe_remote_size("http://127.0.0.1:9/tile.tif").await,
            None
        );
    }

    #[tokio::test]
    async fn test_download_of_invalid_url_is_error() {
        let client = TileClient::new().unwrap();
        let temp_dir = tempfile::tempdir().unwrap();
        let result = client
            .download_to("::nope::", &temp_dir.path().join("x.part"), 1024)
            .await;
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }
}
