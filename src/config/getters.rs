//! Getter methods for `ScrapeConfig`
//!
//! This module provides the accessor methods for retrieving configuration
//! values from a `ScrapeConfig` instance.

use std::path::PathBuf;
use std::time::Duration;

use crate::content_saver::PathPolicy;
use crate::markdown::ConversionOptions;
use crate::rewrite::RewriteRules;

use super::types::ScrapeConfig;

impl ScrapeConfig {
    #[must_use]
    pub fn output_root(&self) -> &PathBuf {
        &self.output_root
    }

    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Whole-request timeout as a `Duration`
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Connect-phase timeout as a `Duration`
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay between retry attempts as a `Duration`
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn path_policy(&self) -> PathPolicy {
        self.path_policy
    }

    #[must_use]
    pub fn domain_subfolders(&self) -> bool {
        self.domain_subfolders
    }

    #[must_use]
    pub fn source_comment(&self) -> bool {
        self.source_comment
    }

    #[must_use]
    pub fn timestamp_comment(&self) -> bool {
        self.timestamp_comment
    }

    #[must_use]
    pub fn rewrite(&self) -> &RewriteRules {
        &self.rewrite
    }

    #[must_use]
    pub fn conversion(&self) -> &ConversionOptions {
        &self.conversion
    }
}
