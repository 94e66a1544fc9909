//! HTTP fetch layer
//!
//! One shared `reqwest` client per run, configured from `ScrapeConfig`.
//! Pages and sitemaps go through the same client with different Accept
//! headers. A non-2xx status is an error, same as a transport failure.

use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;

use crate::config::ScrapeConfig;
use crate::utils::{PAGE_ACCEPT_HEADER, SITEMAP_ACCEPT_HEADER};

/// HTTP client wrapper shared by all workers in a run.
///
/// Cloning is cheap: `reqwest::Client` is an `Arc` around its pool.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    request_timeout: Duration,
}

impl PageFetcher {
    /// Build a fetcher from run configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &ScrapeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent())
            .connect_timeout(config.connect_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            request_timeout: config.request_timeout(),
        })
    }

    /// Fetch an HTML page body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or an
    /// unreadable response body.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        self.fetch(url, PAGE_ACCEPT_HEADER).await
    }

    /// Fetch a sitemap document body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or an
    /// unreadable response body.
    pub async fn fetch_sitemap(&self, url: &str) -> Result<String> {
        self.fetch(url, SITEMAP_ACCEPT_HEADER).await
    }

    async fn fetch(&self, url: &str, accept: &str) -> Result<String> {
        debug!("Fetching {url}");

        let response = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .header("Accept", accept)
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Request to {url} failed with status: {status}"
            ));
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))
    }
}
