//! Declarative HTML rewriting applied before markdown conversion
//!
//! The rewriter runs four stages in a fixed order on one parsed tree:
//! 1. Exclusion - elements matching any exclusion selector are removed
//!    together with their subtree
//! 2. Unwrapping - matching container elements are replaced by their own
//!    children, spliced in place in document order
//! 3. Attribute stripping - every attribute is dropped except
//!    href, src, alt, and title
//! 4. URL absolutization - site-relative `src`/`href` values (a single
//!    leading `/`) are prefixed with the page origin, including
//!    markdown-style image references embedded in `alt` text
//!
//! Rewriting is a best-effort enhancement: any internal failure falls back
//! to the original markup instead of failing the page.

pub mod title;

pub use title::extract_title;

use anyhow::{Context, Result};
use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

/// Matches a markdown image reference with a site-relative path, e.g.
/// `![diagram](/img/diagram.png)`. A `//`-prefixed path is protocol-relative
/// and deliberately not matched.
static ALT_MD_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[([^\]]*)\]\((/(?:[^/)][^)]*)?)\)")
        .expect("ALT_MD_IMAGE_RE: hardcoded regex is valid")
});

/// Tags whose `src` attribute is rewritten during absolutization
const MEDIA_SRC_SELECTOR: &str = "img, audio, video, source, picture";

/// Declarative rule set for the rewrite stages
///
/// Immutable for the duration of a run; every worker reads the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteRules {
    /// Elements matching any of these selectors are removed with their subtree
    pub exclude_selectors: Vec<String>,
    /// Elements matching any of these selectors are replaced by their children
    pub unwrap_selectors: Vec<String>,
    /// Drop every attribute not in [`RewriteRules::KEPT_ATTRIBUTES`]
    pub strip_attributes: bool,
}

impl Default for RewriteRules {
    fn default() -> Self {
        Self {
            // head goes too: the converter would otherwise render <title>
            // text as a stray leading line in the markdown body.
            exclude_selectors: vec![
                "head".to_string(),
                "script".to_string(),
                "style".to_string(),
                "noscript".to_string(),
            ],
            unwrap_selectors: Vec::new(),
            strip_attributes: true,
        }
    }
}

impl RewriteRules {
    /// Attribute names that survive the stripping stage.
    ///
    /// Fixed allow-list: these carry the link targets, media sources, and
    /// alternative text the markdown conversion still needs after stripping.
    pub const KEPT_ATTRIBUTES: [&'static str; 4] = ["href", "src", "alt", "title"];

    /// An empty rule set with stripping disabled
    #[must_use]
    pub fn none() -> Self {
        Self {
            exclude_selectors: Vec::new(),
            unwrap_selectors: Vec::new(),
            strip_attributes: false,
        }
    }

    /// True when no stage would modify the document
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.exclude_selectors.is_empty()
            && self.unwrap_selectors.is_empty()
            && !self.strip_attributes
    }
}

/// Rewrite `html` according to `rules`, absolutizing site-relative URLs
/// against `page_url` when one is supplied.
///
/// Never fails: on any internal error the original markup is returned
/// unchanged and a warning is logged.
#[must_use]
pub fn rewrite_html(html: &str, rules: &RewriteRules, page_url: Option<&str>) -> String {
    if rules.is_noop() && page_url.is_none() {
        return html.to_string();
    }

    match apply_rules(html, rules, page_url) {
        Ok(rewritten) => rewritten,
        Err(e) => {
            log::warn!("HTML rewrite failed, keeping original markup: {e:#}");
            html.to_string()
        }
    }
}

fn apply_rules(html: &str, rules: &RewriteRules, page_url: Option<&str>) -> Result<String> {
    let document = kuchiki::parse_html().one(html.to_string());

    exclude_elements(&document, &rules.exclude_selectors);
    unwrap_elements(&document, &rules.unwrap_selectors);
    if rules.strip_attributes {
        strip_attributes(&document);
    }
    if let Some(url) = page_url {
        match origin_of(url) {
            Some(origin) => absolutize_urls(&document, &origin),
            None => log::debug!("No origin derivable from '{url}', skipping URL rewrite"),
        }
    }

    let mut output = Vec::new();
    document
        .serialize(&mut output)
        .context("Failed to serialize rewritten HTML")?;

    String::from_utf8(output).context("Failed to convert rewritten HTML bytes to UTF-8")
}

/// Stage 1: remove matching elements and their entire subtree.
///
/// An invalid selector skips that one selector; the remaining selectors
/// still apply.
fn exclude_elements(document: &NodeRef, selectors: &[String]) {
    for selector in selectors {
        // Must collect before iteration because we'll detach nodes
        let matches: Vec<_> = match document.select(selector) {
            Ok(iter) => iter.collect(),
            Err(()) => {
                log::warn!("Skipping invalid exclusion selector '{selector}'");
                continue;
            }
        };
        for el in matches {
            el.as_node().detach();
        }
    }
}

/// Stage 2: splice each matching element's children into its position,
/// then remove the element itself.
///
/// Single-pass: matches are collected per selector before any mutation,
/// so newly exposed elements are not re-matched within the same call.
fn unwrap_elements(document: &NodeRef, selectors: &[String]) {
    for selector in selectors {
        let matches: Vec<_> = match document.select(selector) {
            Ok(iter) => iter.collect(),
            Err(()) => {
                log::warn!("Skipping invalid unwrap selector '{selector}'");
                continue;
            }
        };
        for el in matches {
            let node = el.as_node();
            let children: Vec<_> = node.children().collect();
            for child in children {
                node.insert_before(child);
            }
            node.detach();
        }
    }
}

/// Stage 3: drop every attribute whose name is not in the allow-list.
fn strip_attributes(document: &NodeRef) {
    let matches: Vec<_> = match document.select("*") {
        Ok(iter) => iter.collect(),
        Err(()) => return,
    };
    for el in matches {
        let mut attrs = el.attributes.borrow_mut();
        attrs
            .map
            .retain(|name, _| RewriteRules::KEPT_ATTRIBUTES.contains(&&*name.local));
    }
}

/// Stage 4: prefix site-relative URLs with the page origin.
fn absolutize_urls(document: &NodeRef, origin: &str) {
    rewrite_attribute(document, MEDIA_SRC_SELECTOR, "src", origin);
    rewrite_attribute(document, "a", "href", origin);
    rewrite_alt_image_refs(document, origin);
}

fn rewrite_attribute(document: &NodeRef, selector: &str, attr_name: &str, origin: &str) {
    let matches: Vec<_> = match document.select(selector) {
        Ok(iter) => iter.collect(),
        Err(()) => {
            log::warn!("Skipping invalid selector '{selector}' during URL rewrite");
            return;
        }
    };
    for el in matches {
        // Borrow separately to avoid read/write conflicts
        let current = {
            let attrs = el.attributes.borrow();
            attrs.get(attr_name).map(std::string::ToString::to_string)
        };
        if let Some(value) = current {
            if is_site_relative(&value) {
                let mut attrs = el.attributes.borrow_mut();
                attrs.insert(attr_name, format!("{origin}{value}"));
            }
        }
    }
}

/// Rewrite markdown-style image references embedded in `alt` text.
///
/// Some generators pre-render `![alt](/path)` pseudo-markdown into alt
/// attributes; those paths would otherwise dangle after conversion.
fn rewrite_alt_image_refs(document: &NodeRef, origin: &str) {
    let matches: Vec<_> = match document.select("[alt]") {
        Ok(iter) => iter.collect(),
        Err(()) => return,
    };
    for el in matches {
        let alt = {
            let attrs = el.attributes.borrow();
            attrs.get("alt").map(std::string::ToString::to_string)
        };
        if let Some(alt) = alt {
            let rewritten = ALT_MD_IMAGE_RE.replace_all(&alt, |caps: &regex::Captures<'_>| {
                format!("![{}]({}{})", &caps[1], origin, &caps[2])
            });
            if rewritten != alt {
                let mut attrs = el.attributes.borrow_mut();
                attrs.insert("alt", rewritten.into_owned());
            }
        }
    }
}

/// A value starting with a single `/` is site-relative; `//` is
/// protocol-relative and left alone.
fn is_site_relative(value: &str) -> bool {
    value.starts_with('/') && !value.starts_with("//")
}

/// Scheme + host + non-default port of the page URL, without trailing slash.
fn origin_of(page_url: &str) -> Option<String> {
    let parsed = Url::parse(page_url).ok()?;
    let host = parsed.host_str()?;
    let mut origin = format!("{}://{host}", parsed.scheme());
    if let Some(port) = parsed.port() {
        origin.push_str(&format!(":{port}"));
    }
    Some(origin)
}
