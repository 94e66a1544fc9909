//! Recursive sitemap resolution
//!
//! Turns a sitemap URL into a flat list of page URLs. Index documents
//! are followed recursively with the same concurrency ceiling as the
//! page pipeline: children are resolved in fixed-size windows, each
//! window draining fully before the next starts. A visited set keeps
//! self-referencing index trees from recursing forever.
//!
//! Resolution fails soft everywhere: a sitemap that cannot be fetched
//! or parsed contributes nothing and never aborts its siblings.

use std::sync::Arc;

use dashmap::DashSet;
use futures::future::{BoxFuture, join_all};
use log::{info, warn};
use url::Url;

use crate::fetch::PageFetcher;

/// One parsed sitemap document. Lives only for the duration of
/// resolving that document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapNode {
    /// Root listed other sitemap documents.
    Index { children: Vec<String> },
    /// Root listed page locations directly.
    Urlset { locs: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootKind {
    Index,
    Urlset,
}

impl RootKind {
    /// Tag wrapping each `<loc>` entry under this root.
    const fn entry_tag(self) -> &'static [u8] {
        match self {
            Self::Index => b"sitemap",
            Self::Urlset => b"url",
        }
    }
}

/// Resolve a sitemap tree to the flat list of page URLs it references.
///
/// `concurrency` bounds how many child sitemaps of one index are
/// fetched at a time. Page order follows window order; order within a
/// window is not guaranteed.
pub async fn resolve_sitemap(
    fetcher: &PageFetcher,
    sitemap_url: &str,
    concurrency: usize,
) -> Vec<String> {
    let visited: Arc<DashSet<String>> = Arc::new(DashSet::new());
    resolve_inner(fetcher, sitemap_url.to_string(), concurrency, visited).await
}

fn resolve_inner<'a>(
    fetcher: &'a PageFetcher,
    sitemap_url: String,
    concurrency: usize,
    visited: Arc<DashSet<String>>,
) -> BoxFuture<'a, Vec<String>> {
    Box::pin(async move {
        // insert returns false when the URL was already resolved.
        if !visited.insert(sitemap_url.clone()) {
            warn!("Skipping already resolved sitemap {sitemap_url}");
            return Vec::new();
        }

        let body = match fetcher.fetch_sitemap(&sitemap_url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to fetch sitemap {sitemap_url}: {e:#}");
                return Vec::new();
            }
        };

        match parse_sitemap(&body) {
            Some(SitemapNode::Urlset { locs }) => {
                info!("Sitemap {sitemap_url} lists {} pages", locs.len());
                locs
            }
            Some(SitemapNode::Index { children }) => {
                info!(
                    "Sitemap index {sitemap_url} references {} sitemaps",
                    children.len()
                );
                let child_urls: Vec<String> = children
                    .iter()
                    .map(|loc| resolve_child_url(&sitemap_url, loc))
                    .collect();

                let window_size = concurrency.max(1);
                let mut pages = Vec::new();
                for window in child_urls.chunks(window_size) {
                    let batch = window.iter().map(|child| {
                        resolve_inner(fetcher, child.clone(), concurrency, Arc::clone(&visited))
                    });
                    for resolved in join_all(batch).await {
                        pages.extend(resolved);
                    }
                }
                pages
            }
            None => {
                warn!("Document at {sitemap_url} is not a sitemap index or urlset");
                Vec::new()
            }
        }
    })
}

/// Resolve a child location against the document it appeared in.
/// Absolute locations pass through untouched.
fn resolve_child_url(document_url: &str, loc: &str) -> String {
    if loc.starts_with("http://") || loc.starts_with("https://") {
        return loc.to_string();
    }
    match Url::parse(document_url).and_then(|base| base.join(loc)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => loc.to_string(),
    }
}

/// Classify and flatten one sitemap document.
///
/// Returns `None` when the root element is neither `sitemapindex` nor
/// `urlset`. Tag names are matched on their local part so namespace
/// prefixes do not matter. A document that turns malformed partway
/// through keeps the locations collected up to that point.
#[must_use]
pub fn parse_sitemap(xml: &str) -> Option<SitemapNode> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root: Option<RootKind> = None;
    let mut in_entry = false;
    let mut in_loc = false;
    let mut current_loc = String::new();
    let mut locs: Vec<String> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => {
                let local = e.local_name();
                let name = local.as_ref();
                match root {
                    None => {
                        root = match name {
                            b"sitemapindex" => Some(RootKind::Index),
                            b"urlset" => Some(RootKind::Urlset),
                            _ => return None,
                        };
                    }
                    Some(kind) => {
                        if name == kind.entry_tag() && !in_entry {
                            in_entry = true;
                            current_loc.clear();
                        } else if name == b"loc" && in_entry {
                            in_loc = true;
                        }
                    }
                }
            }
            Ok(quick_xml::events::Event::Text(e)) if in_loc => match e.decode() {
                Ok(text) => current_loc.push_str(&text),
                Err(e) => {
                    warn!("Unreadable text in sitemap <loc>: {e}");
                }
            },
            Ok(quick_xml::events::Event::GeneralRef(e)) if in_loc => {
                append_entity_ref(&mut current_loc, &e, reader.decoder());
            }
            Ok(quick_xml::events::Event::End(e)) => {
                let local = e.local_name();
                let name = local.as_ref();
                if name == b"loc" && in_loc {
                    in_loc = false;
                } else if let Some(kind) = root {
                    if name == kind.entry_tag() && in_entry {
                        let loc = current_loc.trim();
                        if !loc.is_empty() {
                            locs.push(loc.to_string());
                        }
                        in_entry = false;
                        current_loc.clear();
                    }
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => {
                warn!("Malformed sitemap XML: {e}");
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    match root {
        Some(RootKind::Index) => Some(SitemapNode::Index { children: locs }),
        Some(RootKind::Urlset) => Some(SitemapNode::Urlset { locs }),
        None => None,
    }
}

/// Append the expansion of an entity reference (`&amp;`, `&#47;`, ...)
/// to the location being collected. Unresolvable references are
/// dropped.
fn append_entity_ref(
    loc: &mut String,
    entity: &quick_xml::events::BytesRef<'_>,
    decoder: quick_xml::Decoder,
) {
    if let Ok(Some(ch)) = entity.resolve_char_ref() {
        loc.push(ch);
        return;
    }
    if let Ok(name) = decoder.decode(entity) {
        if let Some(text) = quick_xml::escape::resolve_predefined_entity(&name) {
            loc.push_str(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlset_locations_in_document_order() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://example.com/a</loc></url>
  <url><loc> https://example.com/b </loc><lastmod>2024-01-01</lastmod></url>
  <url><loc>https://example.com/c</loc></url>
</urlset>"#;

        let node = parse_sitemap(xml).unwrap();
        assert_eq!(
            node,
            SitemapNode::Urlset {
                locs: vec![
                    "https://example.com/a".to_string(),
                    "https://example.com/b".to_string(),
                    "https://example.com/c".to_string(),
                ]
            }
        );
    }

    #[test]
    fn single_entry_urlset_is_one_location() {
        let xml = r#"<urlset><url><loc>https://example.com/only</loc></url></urlset>"#;
        match parse_sitemap(xml).unwrap() {
            SitemapNode::Urlset { locs } => assert_eq!(locs, ["https://example.com/only"]),
            SitemapNode::Index { .. } => panic!("expected urlset"),
        }
    }

    #[test]
    fn empty_urlset_is_empty_list() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"></urlset>"#;
        assert_eq!(
            parse_sitemap(xml).unwrap(),
            SitemapNode::Urlset { locs: Vec::new() }
        );
    }

    #[test]
    fn entries_without_loc_are_skipped() {
        let xml = r#"<urlset>
  <url><lastmod>2024-01-01</lastmod></url>
  <url><loc>https://example.com/kept</loc></url>
  <url><loc>   </loc></url>
</urlset>"#;
        match parse_sitemap(xml).unwrap() {
            SitemapNode::Urlset { locs } => assert_eq!(locs, ["https://example.com/kept"]),
            SitemapNode::Index { .. } => panic!("expected urlset"),
        }
    }

    #[test]
    fn index_root_collects_child_sitemaps() {
        let xml = r#"<?xml version="1.0"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>https://example.com/sitemap-1.xml</loc></sitemap>
  <sitemap><loc>https://example.com/sitemap-2.xml</loc></sitemap>
</sitemapindex>"#;

        assert_eq!(
            parse_sitemap(xml).unwrap(),
            SitemapNode::Index {
                children: vec![
                    "https://example.com/sitemap-1.xml".to_string(),
                    "https://example.com/sitemap-2.xml".to_string(),
                ]
            }
        );
    }

    #[test]
    fn namespace_prefixes_are_ignored() {
        let xml = r#"<ns0:urlset xmlns:ns0="http://www.sitemaps.org/schemas/sitemap/0.9">
  <ns0:url><ns0:loc>https://example.com/page</ns0:loc></ns0:url>
</ns0:urlset>"#;

        match parse_sitemap(xml).unwrap() {
            SitemapNode::Urlset { locs } => assert_eq!(locs, ["https://example.com/page"]),
            SitemapNode::Index { .. } => panic!("expected urlset"),
        }
    }

    #[test]
    fn escaped_ampersands_are_decoded() {
        let xml =
            r#"<urlset><url><loc>https://example.com/search?q=a&amp;page=2</loc></url></urlset>"#;
        match parse_sitemap(xml).unwrap() {
            SitemapNode::Urlset { locs } => {
                assert_eq!(locs, ["https://example.com/search?q=a&page=2"]);
            }
            SitemapNode::Index { .. } => panic!("expected urlset"),
        }
    }

    #[test]
    fn non_sitemap_root_is_rejected() {
        assert_eq!(parse_sitemap("<html><body>404</body></html>"), None);
        assert_eq!(parse_sitemap("plain text"), None);
        assert_eq!(parse_sitemap(""), None);
    }

    #[test]
    fn malformed_tail_keeps_collected_locations() {
        let xml = r#"<urlset>
  <url><loc>https://example.com/a</loc></url>
  <url><loc>https://example.com/b</loc></url>
  <url><loc>https://example.com/c</lo"#;

        match parse_sitemap(xml).unwrap() {
            SitemapNode::Urlset { locs } => {
                assert!(locs.len() >= 2);
                assert_eq!(locs[0], "https://example.com/a");
                assert_eq!(locs[1], "https://example.com/b");
            }
            SitemapNode::Index { .. } => panic!("expected urlset"),
        }
    }

    #[test]
    fn relative_children_resolve_against_document_url() {
        assert_eq!(
            resolve_child_url("https://example.com/sitemaps/index.xml", "part-1.xml"),
            "https://example.com/sitemaps/part-1.xml"
        );
        assert_eq!(
            resolve_child_url("https://example.com/sitemaps/index.xml", "/other/part.xml"),
            "https://example.com/other/part.xml"
        );
        assert_eq!(
            resolve_child_url(
                "https://example.com/index.xml",
                "https://cdn.example.com/sitemap.xml"
            ),
            "https://cdn.example.com/sitemap.xml"
        );
    }
}
