//! Page fetching.
//!
//! Providers only see the [`Fetcher`] trait, so parsing can be driven from
//! canned pages in tests while the binary uses [`HttpFetcher`].

use crate::config::FetcherConfig;
use crate::error::{Result, ScheduleError};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and returns its body decoded as UTF-8.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetcher backed by a `reqwest` client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(&FetcherConfig::default())
    }

    pub fn with_config(config: &FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        info!(url = %url, "Fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScheduleError::Transport {
                url: url.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        // The server-declared charset is ignored; both sources serve UTF-8.
        let bytes = response.bytes().await.map_err(|e| transport(url, e))?;
        debug!(url = %url, len = bytes.len(), "Received page");

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn transport(url: &str, err: reqwest::Error) -> ScheduleError {
    ScheduleError::Transport {
        url: url.to_string(),
        message: err.to_string(),
    }
}
