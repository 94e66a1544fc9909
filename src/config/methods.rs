//! Builder methods available for all states
//!
//! This module contains setters that can be called on the builder
//! regardless of its current type state.

use crate::content_saver::PathPolicy;
use crate::markdown::ConversionOptions;
use crate::rewrite::RewriteRules;

use super::builder::ScrapeConfigBuilder;

impl<State> ScrapeConfigBuilder<State> {
    /// Set the concurrency ceiling for page jobs and sitemap fan-out
    ///
    /// Jobs run in fixed-size windows of this many concurrent fetches;
    /// a new window starts only after the previous one fully drains.
    /// Must be at least 1; `build()` rejects 0.
    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the whole-request timeout in seconds
    #[must_use]
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Set the connect-phase timeout in seconds
    #[must_use]
    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Set the retry ceiling for recoverable per-job failures
    ///
    /// Set to 0 to fail jobs on their first error.
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the fixed delay between retry attempts, in seconds
    #[must_use]
    pub fn retry_delay_secs(mut self, secs: u64) -> Self {
        self.retry_delay_secs = secs;
        self
    }

    /// Set the user-agent header sent with every request
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Select how output filenames are derived from URLs
    ///
    /// # Example
    /// ```rust
    /// # use sitescribe::config::ScrapeConfig;
    /// # use sitescribe::content_saver::PathPolicy;
    /// # fn main() -> anyhow::Result<()> {
    /// let config = ScrapeConfig::builder()
    ///     .path_policy(PathPolicy::PreserveUrlWithQueryHash)
    ///     .output_root("./output")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn path_policy(mut self, policy: PathPolicy) -> Self {
        self.path_policy = policy;
        self
    }

    /// Toggle per-domain subdirectories under the output root
    #[must_use]
    pub fn domain_subfolders(mut self, enabled: bool) -> Self {
        self.domain_subfolders = enabled;
        self
    }

    /// Toggle the `<!-- Source: <url> -->` prefix line in output files
    #[must_use]
    pub fn source_comment(mut self, enabled: bool) -> Self {
        self.source_comment = enabled;
        self
    }

    /// Toggle the `<!-- Generated: <timestamp> -->` prefix line in output files
    #[must_use]
    pub fn timestamp_comment(mut self, enabled: bool) -> Self {
        self.timestamp_comment = enabled;
        self
    }

    /// Replace the HTML rewrite rule set
    #[must_use]
    pub fn rewrite(mut self, rules: RewriteRules) -> Self {
        self.rewrite = rules;
        self
    }

    /// Replace the markdown conversion options
    #[must_use]
    pub fn conversion(mut self, options: ConversionOptions) -> Self {
        self.conversion = options;
        self
    }
}
