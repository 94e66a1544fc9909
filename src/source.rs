//! URL sources
//!
//! A run takes its URL list either from a newline-delimited file or
//! from a sitemap tree resolved at startup.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::config::ScrapeConfig;
use crate::fetch::PageFetcher;
use crate::sitemap;

/// Where the run's URL list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlSource {
    /// Newline-delimited file of page URLs. Blank lines and lines
    /// starting with `//` are ignored.
    File(PathBuf),
    /// Sitemap or sitemap-index URL, resolved recursively before the
    /// pipeline starts.
    Sitemap(String),
}

impl UrlSource {
    /// Materialize the URL list for this source.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL file cannot be read or the fetch
    /// client cannot be built. Sitemap resolution itself fails soft
    /// and yields an empty list instead of an error.
    pub async fn load(&self, config: &ScrapeConfig) -> Result<Vec<String>> {
        match self {
            Self::File(path) => read_url_file(path),
            Self::Sitemap(url) => {
                let fetcher = PageFetcher::from_config(config)?;
                let urls = sitemap::resolve_sitemap(&fetcher, url, config.concurrency()).await;
                info!("Resolved {} URLs from sitemap {url}", urls.len());
                Ok(urls)
            }
        }
    }
}

fn read_url_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read URL file {}", path.display()))?;

    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .map(ToString::to_string)
        .collect();

    info!("Loaded {} URLs from {}", urls.len(), path.display());
    Ok(urls)
}
