//! Shared configuration constants for sitescribe
//!
//! This module contains default values used throughout the codebase to
//! ensure consistency and avoid magic numbers.

/// Default concurrency ceiling: 4 jobs per window
///
/// Page fetches run in fixed-size windows of this many concurrent jobs.
/// Sitemap-index resolution uses the same ceiling for its recursive
/// fan-out, so peak in-flight requests stay bounded and predictable.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default per-request timeout: 30 seconds
///
/// Applies to the whole request (connect + response body). A timed-out
/// fetch counts as a recoverable failure and goes through the normal
/// retry path.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout: 10 seconds
///
/// Separate from the request timeout so a dead host fails fast instead
/// of consuming the full request budget.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default retry ceiling: 3 attempts beyond the first
///
/// A job that keeps failing after this many retries is marked failed and
/// skipped; the batch continues.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay between retry attempts: 2 seconds
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 2;

/// Default output root directory
pub const DEFAULT_OUTPUT_ROOT: &str = "./output";

/// Extension appended to every materialized page file
pub const OUTPUT_EXTENSION: &str = ".md";

/// Filename (and path-segment) fallback when sanitization empties a token
///
/// Also used as the filename for URLs whose path is `/` or empty.
pub const INDEX_FALLBACK: &str = "index";

/// Maximum characters kept from a page title when it names the output file
pub const MAX_TITLE_FILENAME_CHARS: usize = 100;

/// Desktop browser user agent string
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
///
/// A handful of sites serve stripped or blocked responses to obvious
/// bot user agents; a current desktop string keeps fetches boring.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// `Accept` header sent with page fetches
pub const PAGE_ACCEPT_HEADER: &str = "text/html,application/xhtml+xml";

/// `Accept` header sent with sitemap fetches
///
/// Advertises XML first but keeps HTML as a fallback since some servers
/// label sitemap responses as text/html.
pub const SITEMAP_ACCEPT_HEADER: &str = "application/xml,text/xml,text/html";
