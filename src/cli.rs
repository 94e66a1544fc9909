//! Command-line interface
//!
//! Flags override config-file values, which override built-in defaults.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Parser};

use sitescribe::{PathPolicy, ScrapeConfig, UrlSource};

/// Fetch web pages, rewrite their HTML, and materialize them as
/// markdown files under a deterministic directory tree.
#[derive(Debug, Parser)]
#[command(name = "sitescribe")]
#[command(about = "Mirror web pages as markdown files", long_about = None)]
#[command(group = ArgGroup::new("url_source").required(true).args(["urls", "sitemap"]))]
pub struct Cli {
    /// Newline-delimited file of page URLs (blank lines and // comments ignored)
    #[arg(long, value_name = "FILE")]
    pub urls: Option<PathBuf>,

    /// Sitemap or sitemap-index URL to resolve recursively
    #[arg(long, value_name = "URL")]
    pub sitemap: Option<String>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output directory root
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Maximum concurrent page fetches
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Whole-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Retry ceiling for fetch and conversion failures
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Delay between retry attempts in seconds
    #[arg(long, value_name = "SECS")]
    pub retry_delay: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(long, value_name = "AGENT")]
    pub user_agent: Option<String>,

    /// Filename policy: url_path, page_title, or query_hash
    #[arg(long, value_name = "POLICY")]
    pub policy: Option<String>,

    /// Write files directly under the output root without per-domain folders
    #[arg(long)]
    pub flat: bool,

    /// Skip the `<!-- Source: ... -->` comment line
    #[arg(long)]
    pub no_source_comment: bool,

    /// Skip the `<!-- Generated: ... -->` comment line
    #[arg(long)]
    pub no_timestamp_comment: bool,

    /// CSS selector whose matches are removed (repeatable, adds to config)
    #[arg(long, value_name = "SELECTOR")]
    pub exclude: Vec<String>,

    /// CSS selector whose matches are unwrapped (repeatable, adds to config)
    #[arg(long, value_name = "SELECTOR")]
    pub unwrap: Vec<String>,

    /// Keep all element attributes instead of the href/src/alt/title allow-list
    #[arg(long)]
    pub keep_attributes: bool,
}

impl Cli {
    /// Merge CLI flags over the config file (when given) and defaults,
    /// returning the run configuration and URL source.
    ///
    /// # Errors
    ///
    /// Returns an error for an unreadable or invalid config file, an
    /// unknown policy name, or invalid merged settings.
    pub fn into_run_config(self) -> Result<(ScrapeConfig, UrlSource)> {
        let base = match &self.config {
            Some(path) => ScrapeConfig::from_json_file(path)?,
            None => ScrapeConfig::default(),
        };

        let mut rules = base.rewrite().clone();
        rules.exclude_selectors.extend(self.exclude.iter().cloned());
        rules.unwrap_selectors.extend(self.unwrap.iter().cloned());
        if self.keep_attributes {
            rules.strip_attributes = false;
        }

        let mut builder = base.into_builder().rewrite(rules);
        if let Some(output) = self.output {
            builder = builder.output_root(output);
        }
        if let Some(concurrency) = self.concurrency {
            builder = builder.concurrency(concurrency);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.request_timeout_secs(timeout);
        }
        if let Some(retries) = self.retries {
            builder = builder.max_retries(retries);
        }
        if let Some(delay) = self.retry_delay {
            builder = builder.retry_delay_secs(delay);
        }
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(policy) = &self.policy {
            builder = builder.path_policy(parse_policy(policy)?);
        }
        if self.flat {
            builder = builder.domain_subfolders(false);
        }
        if self.no_source_comment {
            builder = builder.source_comment(false);
        }
        if self.no_timestamp_comment {
            builder = builder.timestamp_comment(false);
        }

        let config = builder.build()?;

        let source = match (self.urls, self.sitemap) {
            (Some(path), _) => UrlSource::File(path),
            (None, Some(url)) => UrlSource::Sitemap(url),
            (None, None) => anyhow::bail!("Either --urls or --sitemap is required"),
        };

        Ok((config, source))
    }
}

fn parse_policy(name: &str) -> Result<PathPolicy> {
    match name {
        "url_path" => Ok(PathPolicy::UrlPath),
        "page_title" => Ok(PathPolicy::PageTitle),
        "query_hash" => Ok(PathPolicy::PreserveUrlWithQueryHash),
        other => anyhow::bail!(
            "Unknown policy '{other}' (expected url_path, page_title, or query_hash)"
        ),
    }
}
