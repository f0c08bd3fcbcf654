//! HTTP client for historical bar seeds.

use std::time::Duration;

use candlefold_aggregate::Bar;
use candlefold_types::{BucketWidth, InstrumentId};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::url::{BASE_URL, bars_url};

/// Configuration for the seed client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the bar history API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("candlefold/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Errors that can occur while fetching seed bars.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No history exists for the requested instrument and width.
    #[error("No bar history found at {0}")]
    NotFound(String),

    /// Server returned an error status.
    #[error("Server error: {status}")]
    Server {
        /// HTTP status code.
        status: u16,
    },

    /// Response body was not a bar array.
    #[error("Invalid bar history: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reading a local seed file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP client for bar history.
///
/// Each fetch is a single attempt; failures are returned to the caller.
#[derive(Debug, Clone)]
pub struct SeedClient {
    client: Client,
    config: ClientConfig,
}

impl SeedClient {
    /// Creates a new seed client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches the bar history for an instrument at a bucket width.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server responds with a
    /// non-success status, or the body is not a JSON bar array.
    pub async fn fetch_bars(
        &self,
        instrument: &InstrumentId,
        width: BucketWidth,
    ) -> Result<Vec<Bar>, FetchError> {
        let url = bars_url(&self.config.base_url, instrument, width);
        debug!(%url, "fetching seed bars");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url));
        }
        if !status.is_success() {
            return Err(FetchError::Server {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
