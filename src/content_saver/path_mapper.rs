//! Deterministic URL to output-path mapping
//!
//! Pure functions: the same (url, policy, title) always yields the same
//! path, so re-runs overwrite previous output instead of duplicating it.
//! Mapping never fails. URLs that do not parse go through a best-effort
//! string-split fallback that still produces a stable path.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;
use xxhash_rust::xxh3::xxh3_64;

use crate::utils::{
    INDEX_FALLBACK, MAX_TITLE_FILENAME_CHARS, OUTPUT_EXTENSION, safe_truncate_chars,
};

/// Filename derivation strategy.
///
/// Precedence when several sources of a name are available is fixed:
/// query-hash preservation beats title-based naming beats the plain
/// URL-derived name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathPolicy {
    /// Name files after the last URL path segment.
    #[default]
    #[serde(rename = "url_path")]
    UrlPath,
    /// Name files after the extracted page title when one is available.
    #[serde(rename = "page_title")]
    PageTitle,
    /// Name files after the URL path segment plus a stable hash of the
    /// query string, keeping distinct query strings distinct on disk.
    #[serde(rename = "query_hash")]
    PreserveUrlWithQueryHash,
}

/// Extensions stripped from the final path segment before naming.
const STRIPPED_EXTENSIONS: [&str; 6] = [".html", ".htm", ".php", ".asp", ".aspx", ".jsp"];

/// Query parameters folded into the filename under non-hash policies,
/// checked in this priority order.
const NAMED_QUERY_PARAMS: [&str; 3] = ["id", "page", "slug"];

/// An output location relative to the output root: sanitized directory
/// segments plus a sanitized filename carrying the output extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    dir_segments: Vec<String>,
    filename: String,
}

impl ResolvedPath {
    #[must_use]
    pub fn dir_segments(&self) -> &[String] {
        &self.dir_segments
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Full path of this location under `output_root`.
    #[must_use]
    pub fn within(&self, output_root: &Path) -> PathBuf {
        let mut path = output_root.to_path_buf();
        for segment in &self.dir_segments {
            path.push(segment);
        }
        path.push(&self.filename);
        path
    }
}

/// Map a page URL to its output location.
///
/// A trailing slash in the URL path means the page is a directory
/// index: all path segments become directories and the filename falls
/// back to "index". With `domain_subfolders` the host (minus a leading
/// `www.`) becomes the first directory segment.
#[must_use]
pub fn map_path(
    url: &str,
    policy: PathPolicy,
    domain_subfolders: bool,
    title: Option<&str>,
) -> ResolvedPath {
    match Url::parse(url) {
        Ok(parsed) if parsed.host_str().is_some() => {
            map_parsed(&parsed, policy, domain_subfolders, title)
        }
        _ => map_unparsed(url, policy, domain_subfolders, title),
    }
}

fn map_parsed(
    url: &Url,
    policy: PathPolicy,
    domain_subfolders: bool,
    title: Option<&str>,
) -> ResolvedPath {
    let host = strip_www(url.host_str().unwrap_or_default());

    let raw_path = url.path();
    let mut segments: Vec<&str> = raw_path.split('/').filter(|s| !s.is_empty()).collect();
    let filename = filename_candidate(&mut segments, raw_path.ends_with('/'));

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    let filename = apply_query_policy(filename, url.query(), &pairs, policy);

    assemble(host, &segments, filename, policy, domain_subfolders, title)
}

/// String-split fallback for URLs `Url::parse` rejects. First segment
/// plays the host role, the rest the path.
fn map_unparsed(
    url: &str,
    policy: PathPolicy,
    domain_subfolders: bool,
    title: Option<&str>,
) -> ResolvedPath {
    let trimmed = url.trim();
    let without_scheme = match trimmed.split_once("://") {
        Some((_, rest)) => rest,
        None => trimmed,
    };
    // Fragment first: a #... suffix is never part of the path or query.
    let without_fragment = match without_scheme.split_once('#') {
        Some((head, _)) => head,
        None => without_scheme,
    };
    let (location, query) = match without_fragment.split_once('?') {
        Some((location, query)) => (location, Some(query)),
        None => (without_fragment, None),
    };

    let ends_with_slash = location.ends_with('/');
    let mut segments: Vec<&str> = location.split('/').filter(|s| !s.is_empty()).collect();
    let host = if segments.is_empty() {
        ""
    } else {
        strip_www(segments.remove(0))
    };

    let filename = filename_candidate(&mut segments, ends_with_slash);

    let pairs: Vec<(String, String)> = query
        .map(|q| {
            q.split('&')
                .filter(|pair| !pair.is_empty())
                .map(|pair| match pair.split_once('=') {
                    Some((key, value)) => (key.to_string(), value.to_string()),
                    None => (pair.to_string(), String::new()),
                })
                .collect()
        })
        .unwrap_or_default();
    let filename = apply_query_policy(filename, query, &pairs, policy);

    assemble(host, &segments, filename, policy, domain_subfolders, title)
}

/// Pop the candidate filename off the segment list. A trailing slash or
/// an empty path yields the "index" fallback and leaves every segment a
/// directory.
fn filename_candidate(segments: &mut Vec<&str>, ends_with_slash: bool) -> String {
    if ends_with_slash {
        return INDEX_FALLBACK.to_string();
    }
    match segments.pop() {
        Some(last) => strip_page_extension(last).to_string(),
        None => INDEX_FALLBACK.to_string(),
    }
}

fn apply_query_policy(
    filename: String,
    query: Option<&str>,
    pairs: &[(String, String)],
    policy: PathPolicy,
) -> String {
    let query = match query {
        Some(q) if !q.is_empty() => q,
        _ => return filename,
    };

    if policy == PathPolicy::PreserveUrlWithQueryHash {
        // Stable non-cryptographic hash of the raw query string,
        // rendered as lowercase hex.
        let hash = xxh3_64(query.as_bytes());
        return format!("{filename}-{hash:x}");
    }

    for name in NAMED_QUERY_PARAMS {
        if let Some((_, value)) = pairs.iter().find(|(key, _)| key == name) {
            if value.is_empty() {
                return format!("{filename}-{name}");
            }
            return format!("{filename}-{name}-{value}");
        }
    }

    filename
}

/// Sanitize everything, apply the title policy, append the output
/// extension, and prepend the host directory when enabled.
fn assemble(
    host: &str,
    dir_segments: &[&str],
    filename: String,
    policy: PathPolicy,
    domain_subfolders: bool,
    title: Option<&str>,
) -> ResolvedPath {
    let mut name = sanitize_component(&filename);

    // Query-hash policy keeps the URL-derived name even when a title
    // is available.
    if policy == PathPolicy::PageTitle {
        if let Some(title) = title {
            let capped = safe_truncate_chars(title.trim(), MAX_TITLE_FILENAME_CHARS);
            let from_title = sanitize_segment(capped);
            if !from_title.is_empty() {
                name = from_title;
            }
        }
    }

    name.push_str(OUTPUT_EXTENSION);

    let mut dirs: Vec<String> = Vec::with_capacity(dir_segments.len() + 1);
    if domain_subfolders && !host.is_empty() {
        dirs.push(sanitize_component(host));
    }
    dirs.extend(dir_segments.iter().map(|segment| sanitize_component(segment)));

    ResolvedPath {
        dir_segments: dirs,
        filename: name,
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Strip one recognized page extension off a path segment, matched
/// case-insensitively. Segments that are nothing but an extension are
/// left alone.
fn strip_page_extension(segment: &str) -> &str {
    let bytes = segment.as_bytes();
    for ext in STRIPPED_EXTENSIONS {
        if bytes.len() > ext.len()
            && bytes[bytes.len() - ext.len()..].eq_ignore_ascii_case(ext.as_bytes())
        {
            // The matched suffix is pure ASCII, so the cut is a char boundary.
            return &segment[..segment.len() - ext.len()];
        }
    }
    segment
}

/// Filesystem-safe token, possibly empty: reserved characters removed,
/// whitespace runs collapsed to single dashes.
fn sanitize_segment(raw: &str) -> String {
    let cleaned = sanitize_filename::sanitize(raw.trim());
    cleaned.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Filesystem-safe token that is never empty.
fn sanitize_component(raw: &str) -> String {
    let cleaned = sanitize_segment(raw);
    if cleaned.is_empty() {
        INDEX_FALLBACK.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url_path(url: &str) -> ResolvedPath {
        map_path(url, PathPolicy::UrlPath, false, None)
    }

    #[test]
    fn trailing_slash_maps_to_index_file() {
        let resolved = map_path("https://example.com/about/", PathPolicy::UrlPath, true, None);
        assert_eq!(resolved.dir_segments(), ["example.com", "about"]);
        assert_eq!(resolved.filename(), "index.md");
        assert_eq!(
            resolved.within(Path::new("out")),
            Path::new("out/example.com/about/index.md")
        );
    }

    #[test]
    fn last_segment_becomes_filename() {
        let resolved = url_path("https://example.com/docs/guide");
        assert_eq!(resolved.dir_segments(), ["docs"]);
        assert_eq!(resolved.filename(), "guide.md");
    }

    #[test]
    fn root_url_maps_to_index() {
        let resolved = url_path("https://example.com/");
        assert!(resolved.dir_segments().is_empty());
        assert_eq!(resolved.filename(), "index.md");

        let no_slash = url_path("https://example.com");
        assert_eq!(no_slash.filename(), "index.md");
    }

    #[test]
    fn recognized_extensions_are_stripped() {
        assert_eq!(url_path("https://example.com/page.html").filename(), "page.md");
        assert_eq!(url_path("https://example.com/page.PHP").filename(), "page.md");
        assert_eq!(url_path("https://example.com/page.aspx").filename(), "page.md");
        // Unrecognized extensions stay part of the name.
        assert_eq!(url_path("https://example.com/data.json").filename(), "data.json.md");
    }

    #[test]
    fn multibyte_segments_survive_extension_stripping() {
        // Fallback segments can carry raw non-ASCII text.
        let stripped = map_path("docs/pag€.html", PathPolicy::UrlPath, false, None);
        assert_eq!(stripped.filename(), "pag€.md");

        // Last bytes overlap ".html" without matching it.
        let untouched = map_path("docs/a€html", PathPolicy::UrlPath, false, None);
        assert_eq!(untouched.filename(), "a€html.md");
    }

    #[test]
    fn www_prefix_is_dropped_from_host() {
        let resolved = map_path("https://www.example.com/a", PathPolicy::UrlPath, true, None);
        assert_eq!(resolved.dir_segments(), ["example.com"]);
    }

    #[test]
    fn domain_subfolders_off_omits_host() {
        let resolved = map_path("https://example.com/a/b", PathPolicy::UrlPath, false, None);
        assert_eq!(resolved.dir_segments(), ["a"]);
        assert_eq!(resolved.filename(), "b.md");
    }

    #[test]
    fn query_hash_policy_appends_stable_hex_suffix() {
        let first = map_path(
            "https://example.com/products?id=123&category=books",
            PathPolicy::PreserveUrlWithQueryHash,
            false,
            None,
        );
        let again = map_path(
            "https://example.com/products?id=123&category=books",
            PathPolicy::PreserveUrlWithQueryHash,
            false,
            None,
        );
        assert_eq!(first, again);

        let name = first.filename();
        assert!(name.starts_with("products-"));
        assert!(name.ends_with(".md"));
        let suffix = &name["products-".len()..name.len() - ".md".len()];
        assert!(!suffix.is_empty());
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn distinct_query_strings_hash_to_distinct_filenames() {
        let a = map_path(
            "https://example.com/products?id=123&category=books",
            PathPolicy::PreserveUrlWithQueryHash,
            false,
            None,
        );
        let b = map_path(
            "https://example.com/products?id=124&category=books",
            PathPolicy::PreserveUrlWithQueryHash,
            false,
            None,
        );
        assert_ne!(a.filename(), b.filename());
    }

    #[test]
    fn query_hash_policy_ignores_title() {
        let resolved = map_path(
            "https://example.com/products?id=1",
            PathPolicy::PreserveUrlWithQueryHash,
            false,
            Some("Product Catalog"),
        );
        assert!(resolved.filename().starts_with("products-"));
    }

    #[test]
    fn named_params_fold_into_filename_by_priority() {
        let id = url_path("https://example.com/products?id=123&category=books");
        assert_eq!(id.filename(), "products-id-123.md");

        let page = url_path("https://example.com/list?page=2");
        assert_eq!(page.filename(), "list-page-2.md");

        // "id" wins even when another named param comes first.
        let both = url_path("https://example.com/p?slug=intro&id=9");
        assert_eq!(both.filename(), "p-id-9.md");

        let unrelated = url_path("https://example.com/p?category=books");
        assert_eq!(unrelated.filename(), "p.md");
    }

    #[test]
    fn title_policy_replaces_filename() {
        let resolved = map_path(
            "https://example.com/docs/page",
            PathPolicy::PageTitle,
            false,
            Some("Getting Started Guide"),
        );
        assert_eq!(resolved.filename(), "Getting-Started-Guide.md");
        assert_eq!(resolved.dir_segments(), ["docs"]);
    }

    #[test]
    fn empty_or_missing_title_keeps_url_name() {
        let missing = map_path("https://example.com/docs/page", PathPolicy::PageTitle, false, None);
        assert_eq!(missing.filename(), "page.md");

        let blank = map_path(
            "https://example.com/docs/page",
            PathPolicy::PageTitle,
            false,
            Some("   "),
        );
        assert_eq!(blank.filename(), "page.md");
    }

    #[test]
    fn long_titles_are_capped_at_char_boundaries() {
        let title = "é".repeat(300);
        let resolved = map_path(
            "https://example.com/p",
            PathPolicy::PageTitle,
            false,
            Some(&title),
        );
        let name = resolved.filename();
        let stem = &name[..name.len() - ".md".len()];
        assert_eq!(stem.chars().count(), MAX_TITLE_FILENAME_CHARS);
    }

    #[test]
    fn malformed_urls_fall_back_deterministically() {
        let first = map_path("example.com/foo/bar", PathPolicy::UrlPath, true, None);
        let again = map_path("example.com/foo/bar", PathPolicy::UrlPath, true, None);
        assert_eq!(first, again);
        assert_eq!(first.dir_segments(), ["example.com", "foo"]);
        assert_eq!(first.filename(), "bar.md");

        let garbage = map_path("not a url", PathPolicy::UrlPath, false, None);
        assert_eq!(garbage.filename(), "index.md");
    }

    #[test]
    fn fallback_drops_fragments() {
        let plain = map_path("example.com/page#section", PathPolicy::UrlPath, false, None);
        assert_eq!(plain.filename(), "page.md");

        // The fragment never bleeds into a named-param value.
        let named = map_path("example.com/p?id=1#frag", PathPolicy::UrlPath, false, None);
        assert_eq!(named.filename(), "p-id-1.md");

        // Nor into the query hash: same query, same name.
        let hashed = map_path(
            "example.com/p?id=1#frag",
            PathPolicy::PreserveUrlWithQueryHash,
            false,
            None,
        );
        let bare = map_path(
            "example.com/p?id=1",
            PathPolicy::PreserveUrlWithQueryHash,
            false,
            None,
        );
        assert_eq!(hashed.filename(), bare.filename());
    }

    #[test]
    fn fallback_honors_query_policies() {
        let hashed = map_path(
            "example.com/products?id=123",
            PathPolicy::PreserveUrlWithQueryHash,
            false,
            None,
        );
        assert!(hashed.filename().starts_with("products-"));
        assert!(hashed.filename().ends_with(".md"));

        let named = map_path("example.com/products?id=123", PathPolicy::UrlPath, false, None);
        assert_eq!(named.filename(), "products-id-123.md");
    }

    #[test]
    fn segments_never_contain_separators() {
        let resolved = map_path(
            "https://example.com/a/b?id=..%2F..%2Fetc",
            PathPolicy::UrlPath,
            true,
            None,
        );
        for segment in resolved.dir_segments() {
            assert!(!segment.contains('/'));
            assert!(!segment.contains('\\'));
            assert!(!segment.is_empty());
        }
        assert!(!resolved.filename().contains('/'));
    }

    #[test]
    fn path_policy_parses_from_json() {
        let policy: PathPolicy = serde_json::from_str("\"query_hash\"").unwrap();
        assert_eq!(policy, PathPolicy::PreserveUrlWithQueryHash);
        let policy: PathPolicy = serde_json::from_str("\"page_title\"").unwrap();
        assert_eq!(policy, PathPolicy::PageTitle);
        let policy: PathPolicy = serde_json::from_str("\"url_path\"").unwrap();
        assert_eq!(policy, PathPolicy::UrlPath);
    }
}
