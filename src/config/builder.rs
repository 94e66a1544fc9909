//! Type-safe builder for `ScrapeConfig` using the typestate pattern
//!
//! This module provides a fluent builder interface with compile-time
//! validation ensuring the output root is set before building a
//! `ScrapeConfig`.

use anyhow::{Result, anyhow};
use std::marker::PhantomData;
use std::path::PathBuf;

use crate::content_saver::PathPolicy;
use crate::markdown::ConversionOptions;
use crate::rewrite::RewriteRules;
use crate::utils::{
    DEFAULT_CONCURRENCY, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_RETRIES,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRY_DELAY_SECS, DEFAULT_USER_AGENT,
};

use super::types::ScrapeConfig;

// Type state for the builder
pub struct WithOutputRoot;

pub struct ScrapeConfigBuilder<State = ()> {
    pub(crate) output_root: Option<PathBuf>,
    pub(crate) concurrency: usize,
    pub(crate) request_timeout_secs: u64,
    pub(crate) connect_timeout_secs: u64,
    pub(crate) max_retries: u32,
    pub(crate) retry_delay_secs: u64,
    pub(crate) user_agent: String,
    pub(crate) path_policy: PathPolicy,
    pub(crate) domain_subfolders: bool,
    pub(crate) source_comment: bool,
    pub(crate) timestamp_comment: bool,
    pub(crate) rewrite: RewriteRules,
    pub(crate) conversion: ConversionOptions,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ScrapeConfigBuilder<()> {
    fn default() -> Self {
        Self {
            output_root: None,
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            path_policy: PathPolicy::default(),
            domain_subfolders: true,
            source_comment: true,
            timestamp_comment: true,
            rewrite: RewriteRules::default(),
            conversion: ConversionOptions::default(),
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfig {
    /// Create a builder for configuring a `ScrapeConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder<()> {
        ScrapeConfigBuilder::default()
    }

    /// Turn a loaded or default config back into a builder for further edits
    #[must_use]
    pub fn into_builder(self) -> ScrapeConfigBuilder<WithOutputRoot> {
        ScrapeConfigBuilder {
            output_root: Some(self.output_root),
            concurrency: self.concurrency,
            request_timeout_secs: self.request_timeout_secs,
            connect_timeout_secs: self.connect_timeout_secs,
            max_retries: self.max_retries,
            retry_delay_secs: self.retry_delay_secs,
            user_agent: self.user_agent,
            path_policy: self.path_policy,
            domain_subfolders: self.domain_subfolders,
            source_comment: self.source_comment,
            timestamp_comment: self.timestamp_comment,
            rewrite: self.rewrite,
            conversion: self.conversion,
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfigBuilder<()> {
    pub fn output_root(self, dir: impl Into<PathBuf>) -> ScrapeConfigBuilder<WithOutputRoot> {
        ScrapeConfigBuilder {
            output_root: Some(dir.into()),
            concurrency: self.concurrency,
            request_timeout_secs: self.request_timeout_secs,
            connect_timeout_secs: self.connect_timeout_secs,
            max_retries: self.max_retries,
            retry_delay_secs: self.retry_delay_secs,
            user_agent: self.user_agent,
            path_policy: self.path_policy,
            domain_subfolders: self.domain_subfolders,
            source_comment: self.source_comment,
            timestamp_comment: self.timestamp_comment,
            rewrite: self.rewrite,
            conversion: self.conversion,
            _phantom: PhantomData,
        }
    }
}

// Build method only available once the output root is set
impl ScrapeConfigBuilder<WithOutputRoot> {
    /// Replace the output root on an already-rooted builder.
    #[must_use]
    pub fn output_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_root = Some(dir.into());
        self
    }

    pub fn build(self) -> Result<ScrapeConfig> {
        let output_root = self
            .output_root
            .ok_or_else(|| anyhow!("output_root is required"))?;
        if output_root.as_os_str().is_empty() {
            return Err(anyhow!("output_root must not be empty"));
        }
        if self.concurrency == 0 {
            return Err(anyhow!("concurrency must be at least 1"));
        }

        Ok(ScrapeConfig {
            output_root,
            concurrency: self.concurrency,
            request_timeout_secs: self.request_timeout_secs,
            connect_timeout_secs: self.connect_timeout_secs,
            max_retries: self.max_retries,
            retry_delay_secs: self.retry_delay_secs,
            user_agent: self.user_agent,
            path_policy: self.path_policy,
            domain_subfolders: self.domain_subfolders,
            source_comment: self.source_comment,
            timestamp_comment: self.timestamp_comment,
            rewrite: self.rewrite,
            conversion: self.conversion,
        })
    }
}
