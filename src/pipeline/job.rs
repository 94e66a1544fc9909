//! Single page processing
//!
//! One job owns one URL and moves it through fetch, rewrite, convert,
//! path mapping, and write. Fetch and conversion failures are retried
//! with a fixed delay up to the configured ceiling; write failures are
//! terminal. Nothing is written for a job that does not reach the end.

use std::path::PathBuf;

use tracing::warn;

use crate::config::ScrapeConfig;
use crate::content_saver::{self, PathPolicy};
use crate::fetch::PageFetcher;
use crate::markdown;
use crate::rewrite;

/// One page moving through the pipeline. Owned by exactly one worker
/// at a time.
#[derive(Debug, Clone)]
pub struct PageJob {
    url: String,
    retry_count: u32,
}

impl PageJob {
    #[must_use]
    pub fn new(url: String) -> Self {
        Self {
            url,
            retry_count: 0,
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }
}

/// Why a processing step failed, classified for retry purposes.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// Network fetch failed or returned a non-success status
    #[error("Fetch failed: {0}")]
    Fetch(String),
    /// Markdown conversion failed or produced empty output
    #[error("Conversion failed: {0}")]
    Convert(String),
    /// Output file could not be written
    #[error("Write failed: {0}")]
    Write(String),
}

impl JobError {
    /// Whether another fetch attempt could change the outcome.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Convert(_))
    }
}

/// Run one job to completion.
///
/// Retryable failures sleep for the configured delay and re-enter the
/// fetch stage with the retry count incremented, up to `max_retries`
/// additional attempts after the first. Returns the written path on
/// success.
///
/// # Errors
///
/// Returns the last `JobError` once retries are exhausted, or
/// immediately for a non-retryable failure.
pub async fn run_job(
    mut job: PageJob,
    fetcher: &PageFetcher,
    config: &ScrapeConfig,
) -> Result<PathBuf, JobError> {
    loop {
        match process_once(job.url(), fetcher, config).await {
            Ok(path) => return Ok(path),
            Err(e) if e.is_retryable() && job.retry_count < config.max_retries() => {
                job.retry_count += 1;
                warn!(
                    "Attempt {} failed for {}: {e}; retrying in {}s",
                    job.retry_count,
                    job.url(),
                    config.retry_delay().as_secs()
                );
                tokio::time::sleep(config.retry_delay()).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// One pass through the full fetch/rewrite/convert/map/write sequence.
///
/// Under the page-title policy the single fetched body serves both
/// title extraction and conversion, so the page is never fetched twice
/// in one attempt.
async fn process_once(
    url: &str,
    fetcher: &PageFetcher,
    config: &ScrapeConfig,
) -> Result<PathBuf, JobError> {
    let html = fetcher
        .fetch_page(url)
        .await
        .map_err(|e| JobError::Fetch(format!("{e:#}")))?;

    let title = if config.path_policy() == PathPolicy::PageTitle {
        rewrite::extract_title(&html)
    } else {
        None
    };

    let rewritten = rewrite::rewrite_html(&html, config.rewrite(), Some(url));
    let markdown = markdown::convert_to_markdown(&rewritten, config.conversion())
        .map_err(|e| JobError::Convert(format!("{e:#}")))?;

    let resolved = content_saver::map_path(
        url,
        config.path_policy(),
        config.domain_subfolders(),
        title.as_deref(),
    );
    let path = resolved.within(config.output_root());

    content_saver::write_output(
        &path,
        &markdown,
        url,
        config.source_comment(),
        config.timestamp_comment(),
    )
    .map_err(|e| JobError::Write(format!("{e:#}")))?;

    Ok(path)
}
