//! Core HTTP operations with per-operation timeouts
//!
//! Every request is a single attempt. Timeouts are surfaced as
//! `DownloadError::Timeout` so they read the same as any other transport
//! failure in the failure log.

use std::time::Duration;

use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

use crate::errors::{DownloadError, DownloadResult};

/// HTTP operations handler
#[derive(Debug, Clone)]
pub struct HttpHandler {
    client: Client,
}

impl HttpHandler {
    /// Creates a new HttpHandler around a configured client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Sends a HEAD request and reads the advertised `Content-Length`
    ///
    /// The header is read directly rather than through
    /// `Response::content_length`, which reports the (empty) HEAD body.
    /// Returns `Ok(None)` when the header is absent or not a number.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` on transport failure, timeout or a non-success
    /// status.
    pub async fn head_content_length(
        &self,
        url: &Url,
        timeout: Duration,
    ) -> DownloadResult<Option<u64>> {
        let response = self
            .client
            .head(url.as_str())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_timeout(e, timeout))?;

        if !response.status().is_success() {
            return Err(DownloadError::ServerError {
                status: response.status().as_u16(),
            });
        }

        let length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        debug!("HEAD {} -> content length {:?}", url, length);
        Ok(length)
    }

    /// Sends a GET request and returns the response once headers arrive
    ///
    /// `timeout` bounds the time until the response headers are received; the
    /// body is read separately by the caller.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` on transport failure, timeout or a non-success
    /// status.
    pub async fn get_response(&self, url: &Url, timeout: Duration) -> DownloadResult<Response> {
        let response = tokio::time::timeout(timeout, self.client.get(url.as_str()).send())
            .await
            .map_err(|_| DownloadError::Timeout {
                seconds: timeout.as_secs(),
            })??;

        if !response.status().is_success() {
            return Err(DownloadError::ServerError {
                status: response.status().as_u16(),
            });
        }

        debug!("GET {} -> {}", url, response.status());
        Ok(response)
    }
}

fn map_timeout(error: reqwest::Error, timeout: Duration) -> DownloadError {
    if error.is_timeout() {
        DownloadError::Timeout {
            seconds: timeout.as_secs(),
        }
    } else {
        DownloadError::Http(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::client::config::ClientConfig;

    fn create_test_handler() -> HttpHandler {
        let client = ClientConfig::default().build_http_client().unwrap();
        HttpHandler::new(client)
    }

    #[tokio::test]
    async fn test_head_connection_refused_is_error() {
        // Port 9 on localhost is expected to refuse connections
        let handler = create_test_handler();
        let url = Url::parse("http://127.0.0.1:9/tile.tif").unwrap();
        let result = handler
            .head_content_length(&url, Duration::from_secs(2))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_connection_refused_is_error() {
        let handler = create_test_handler();
        let url = Url::parse("http://127.0.0.1:9/tile.tif").unwrap();
        let result = handler.get_response(&url, Duration::from_secs(2)).await;
        assert!(matches!(
            result,
            Err(DownloadError::Http(_)) | Err(DownloadError::Timeout { .. })
        ));
    }
}
