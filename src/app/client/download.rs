//! Streaming body transfer into a staging file
//!
//! The body is read chunk by chunk and written through a fixed-size buffer, so
//! memory use stays bounded regardless of tile size. Promotion of the staging
//! file to its destination is left to the caller.

use std::path::Path;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;
use url::Url;

use crate::app::client::http::HttpHandler;
use crate::errors::{DownloadError, DownloadResult};

/// File download operations handler
pub struct DownloadHandler<'a> {
    http_handler: &'a HttpHandler,
    read_timeout: Duration,
    chunk_size: usize,
}

impl<'a> DownloadHandler<'a> {
    /// Creates a new DownloadHandler with the given HTTP handler
    pub fn new(http_handler: &'a HttpHandler, read_timeout: Duration, chunk_size: usize) -> Self {
        Self {
            http_handler,
            read_timeout,
            chunk_size,
        }
    }

    /// Streams the body at `url` into `staging_path`, creating or truncating it
    ///
    /// Returns the number of bytes written. On error the partially written
    /// file is left in place for the caller to remove.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The request fails or the server answers with a non-success status
    /// - Sending the request or any single body read exceeds the read timeout
    /// - Creating or writing the staging file fails
    pub async fn download_to(&self, url: &Url, staging_path: &Path) -> DownloadResult<u64> {
        let mut response = self.http_handler.get_response(url, self.read_timeout).await?;

        let file = File::create(staging_path).await?;
        let mut writer = BufWriter::with_capacity(self.chunk_size, file);
        let mut written: u64 = 0;

        loop {
            let chunk = tokio::time::timeout(self.read_timeout, response.chunk())
                .await
                .map_err(|_| DownloadError::Timeout {
                    seconds: self.read_timeout.as_secs(),
                })??;

            match chunk {
                Some(bytes) => {
                    writer.write_all(&bytes).await?;
                    written += bytes.len() as u64;
                }
                None => break,
            }
        }

        writer.flush().await?;
        let file = writer.into_inner();
        file.sync_all().await?;

        debug!("Streamed {} bytes into {}", written, staging_path.display());
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    use crate::app::client::config::ClientConfig;
    use crate::constants::files;

    #[tokio::test]
    async fn test_failed_request_creates_no_staging_file() {
        let temp_dir = tempdir().unwrap();
        let staging = temp_dir.path().join("tile.tif.part");

        let client = ClientConfig::default().build_http_client().unwrap();
        let http_handler = HttpHandler::new(client);
        let handler = DownloadHandler::new(&http_handler, Duration::from_secs(2), files::CHUNK_SIZE);

        let url = Url::parse("http://127.0.0.1:9/tile.tif").unwrap();
        let result = handler.download_to(&url, &staging).await;

        assert!(result.is_err());
        assert!(!staging.exists());
    }
}
