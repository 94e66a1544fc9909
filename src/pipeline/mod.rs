//! Bounded-concurrency page pipeline
//!
//! Partitions the URL list into consecutive windows of at most
//! `concurrency` jobs. All jobs in a window run concurrently; the next
//! window starts only once the current one has fully drained. Progress
//! is logged after each window as completed/total. One page failing
//! permanently never aborts the run.

pub mod job;

use std::time::{Duration, Instant};

use anyhow::Result;
use futures::future::join_all;
use tracing::{error, info, warn};

use crate::config::ScrapeConfig;
use crate::fetch::PageFetcher;

pub use job::{JobError, PageJob, run_job};

/// Outcome counters for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

/// Process every URL under the configured concurrency ceiling.
///
/// An empty URL list is not an error: the run logs a warning and
/// returns zeroed counters.
///
/// # Errors
///
/// Returns an error only when the run cannot start at all, such as the
/// HTTP client failing to build. Per-page failures are counted in the
/// returned stats instead.
pub async fn run(urls: Vec<String>, config: &ScrapeConfig) -> Result<RunStats> {
    let started = Instant::now();

    if urls.is_empty() {
        warn!("URL source is empty; nothing to process");
        return Ok(RunStats {
            elapsed: started.elapsed(),
            ..RunStats::default()
        });
    }

    let fetcher = PageFetcher::from_config(config)?;

    let total = urls.len();
    let window_size = config.concurrency().max(1);
    info!("Processing {total} pages with concurrency {window_size}");

    let mut succeeded = 0usize;
    let mut failed = 0usize;
    let mut completed = 0usize;

    for window in urls.chunks(window_size) {
        let futures = window.iter().map(|url| {
            let job = PageJob::new(url.clone());
            let fetcher = &fetcher;
            async move {
                let url = job.url().to_string();
                (url, run_job(job, fetcher, config).await)
            }
        });

        for (url, result) in join_all(futures).await {
            completed += 1;
            match result {
                Ok(path) => {
                    succeeded += 1;
                    info!("Processed {url} -> {}", path.display());
                }
                Err(e) => {
                    failed += 1;
                    error!("Failed {url}: {e}");
                }
            }
        }

        let percent = completed * 100 / total;
        info!("Progress: {completed}/{total} ({percent}%)");
    }

    Ok(RunStats {
        total,
        succeeded,
        failed,
        elapsed: started.elapsed(),
    })
}
