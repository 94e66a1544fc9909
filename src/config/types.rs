//! Core configuration types for scrape runs
//!
//! This module contains the main `ScrapeConfig` struct that carries every
//! setting a run needs. One immutable value is threaded through the
//! resolver, pipeline, rewriter, and writer, so tests can run isolated
//! configurations side by side without ambient state.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::content_saver::PathPolicy;
use crate::markdown::ConversionOptions;
use crate::rewrite::RewriteRules;
use crate::utils::{
    DEFAULT_CONCURRENCY, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_RETRIES, DEFAULT_OUTPUT_ROOT,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRY_DELAY_SECS, DEFAULT_USER_AGENT,
};

/// Main configuration struct for scrape-and-materialize runs
///
/// Loadable from a JSON file (every field optional, unknown fields
/// rejected) and overridable via the builder or CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrapeConfig {
    /// Root directory the output tree is materialized under.
    ///
    /// **INVARIANT:** Never empty (enforced in builder and file load).
    /// Relative paths are resolved against the working directory at
    /// write time.
    pub(crate) output_root: PathBuf,

    /// Concurrency ceiling for page jobs and sitemap fan-out.
    /// Jobs run in fixed windows of this size; the next window starts
    /// only after the current one fully drains.
    pub(crate) concurrency: usize,

    /// Whole-request timeout in seconds (connect + body).
    pub(crate) request_timeout_secs: u64,

    /// Connect-phase timeout in seconds.
    pub(crate) connect_timeout_secs: u64,

    /// Retry ceiling for recoverable per-job failures.
    pub(crate) max_retries: u32,

    /// Fixed delay in seconds between retry attempts.
    pub(crate) retry_delay_secs: u64,

    /// User-agent header sent with every request.
    pub(crate) user_agent: String,

    /// Strategy for deriving output filenames from URLs.
    pub(crate) path_policy: PathPolicy,

    /// Put each page under a `<host>/` subdirectory of the output root.
    pub(crate) domain_subfolders: bool,

    /// Prefix each output file with a `<!-- Source: <url> -->` line.
    pub(crate) source_comment: bool,

    /// Prefix each output file with a `<!-- Generated: <timestamp> -->` line.
    pub(crate) timestamp_comment: bool,

    /// Declarative HTML rewrite rules applied before conversion.
    pub(crate) rewrite: RewriteRules,

    /// Options handed to the markdown conversion engine.
    pub(crate) conversion: ConversionOptions,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
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
        }
    }
}

impl ScrapeConfig {
    /// Load a configuration from a JSON file.
    ///
    /// Missing fields take their defaults; unknown fields are an error so
    /// typos surface at load time instead of silently doing nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON,
    /// contains unknown fields, or sets an empty `output_root`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        if config.output_root.as_os_str().is_empty() {
            anyhow::bail!("output_root must not be empty (in {})", path.display());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = ScrapeConfig::default();
        assert_eq!(config.output_root, PathBuf::from("./output"));
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.max_retries, 3);
        assert!(config.domain_subfolders);
        assert!(config.source_comment);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{ "concurrency": 8, "domain_subfolders": false }"#;
        let config: ScrapeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.concurrency, 8);
        assert!(!config.domain_subfolders);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.output_root, PathBuf::from("./output"));
    }

    #[test]
    fn unknown_fields_rejected() {
        let json = r#"{ "concurency": 8 }"#;
        let result = serde_json::from_str::<ScrapeConfig>(json);
        assert!(result.is_err());
    }

    #[test]
    fn json_roundtrip() {
        let config = ScrapeConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ScrapeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.concurrency, config.concurrency);
        assert_eq!(parsed.user_agent, config.user_agent);
        assert_eq!(parsed.path_policy, config.path_policy);
    }

    #[test]
    fn nested_sections_parse() {
        let json = r#"{
            "path_policy": "query_hash",
            "rewrite": { "exclude_selectors": ["nav", ".ads"], "strip_attributes": false },
            "conversion": { "heading_style": "setext" }
        }"#;
        let config: ScrapeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.path_policy, PathPolicy::PreserveUrlWithQueryHash);
        assert_eq!(config.rewrite.exclude_selectors, vec!["nav", ".ads"]);
        assert!(!config.rewrite.strip_attributes);
    }
}
