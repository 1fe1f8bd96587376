//! HTTP client configuration and building logic
//!
//! This module handles the configuration and construction of the HTTP client
//! shared by every download worker.

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::constants::http;
use crate::errors::{ConfigError, ConfigResult};

/// Configuration for the tile HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// User agent sent with every request
    pub user_agent: String,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Timeout for the HEAD size probe
    pub probe_timeout: Duration,
    /// Timeout for sending a GET request and for each body read
    pub download_timeout: Duration,
    /// Connection pool idle timeout
    pub pool_idle_timeout: Option<Duration>,
    /// TCP nodelay (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
    /// Maximum number of redirects to follow
    pub max_redirects: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: http::USER_AGENT.to_string(),
            connect_timeout: http::CONNECT_TIMEOUT,
            probe_timeout: http::PROBE_TIMEOUT,
            download_timeout: http::DOWNLOAD_TIMEOUT,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            tcp_nodelay: true,
            max_redirects: http::MAX_REDIRECTS,
        }
    }
}

impl ClientConfig {
    /// Set the probe timeout
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Set the download timeout
    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    /// Validate timeouts
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("probe_timeout", self.probe_timeout),
            ("download_timeout", self.download_timeout),
            ("connect_timeout", self.connect_timeout),
        ] {
            if value.is_zero() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: "0".to_string(),
                    reason: "Timeouts must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Builds the HTTP client with the specified configuration
    ///
    /// No overall request timeout is set here: the probe and the download
    /// apply their own, so a large tile is bounded per read rather than as a
    /// whole.
    pub fn build_http_client(&self) -> ConfigResult<Client> {
        let mut client_builder = Client::builder()
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent.as_str())
            .tcp_nodelay(self.tcp_nodelay)
            .redirect(Policy::limited(self.max_redirects));

        if let Some(idle_timeout) = self.pool_idle_timeout {
            client_builder = client_builder.pool_idle_timeout(idle_timeout);
        }

        Ok(client_builder.build()?)
    }
}
