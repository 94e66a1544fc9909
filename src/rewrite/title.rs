//! Page title extraction
//!
//! Used by the title-based filename policy. Tries, in order: the first
//! `<title>` element, the first `<h1>`, then `<meta name="title">`.
//! Returns the first non-empty trimmed match. Parse problems never
//! surface as errors, they just yield `None`.

use scraper::{Html, Selector};
use std::sync::LazyLock;

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("title").expect("BUG: hardcoded CSS selector 'title' is invalid")
});

static H1_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("BUG: hardcoded CSS selector 'h1' is invalid"));

static META_TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("meta[name='title']")
        .expect("BUG: hardcoded CSS selector \"meta[name='title']\" is invalid")
});

/// Extract a page title from raw markup.
///
/// Fallback chain: `<title>` text, then `<h1>` text, then the `content`
/// attribute of `<meta name="title">`. Whitespace-only candidates fall
/// through to the next source.
#[must_use]
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    if let Some(el) = document.select(&TITLE_SELECTOR).next() {
        let text = el.text().collect::<String>();
        let text = text.trim();
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }

    if let Some(el) = document.select(&H1_SELECTOR).next() {
        let text = el.text().collect::<String>();
        let text = text.trim();
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }

    document
        .select(&META_TITLE_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_element_wins() {
        let html = "<html><head><title>Doc Title</title></head><body><h1>Heading</h1></body></html>";
        assert_eq!(extract_title(html), Some("Doc Title".to_string()));
    }

    #[test]
    fn title_text_is_trimmed() {
        let html = "<title>\n  Spaced Out  \n</title>";
        assert_eq!(extract_title(html), Some("Spaced Out".to_string()));
    }

    #[test]
    fn empty_title_falls_back_to_h1() {
        let html = "<html><head><title>   </title></head><body><h1>Main Heading</h1></body></html>";
        assert_eq!(extract_title(html), Some("Main Heading".to_string()));
    }

    #[test]
    fn meta_title_is_last_resort() {
        let html = r#"<html><head><meta name="title" content="Meta Name"></head><body><p>x</p></body></html>"#;
        assert_eq!(extract_title(html), Some("Meta Name".to_string()));
    }

    #[test]
    fn entities_are_decoded() {
        let html = "<title>Fish &amp; Chips</title>";
        assert_eq!(extract_title(html), Some("Fish & Chips".to_string()));
    }

    #[test]
    fn no_candidates_yields_none() {
        let html = "<html><body><p>just a paragraph</p></body></html>";
        assert_eq!(extract_title(html), None);
    }

    #[test]
    fn first_h1_is_used() {
        let html = "<body><h1>First</h1><h1>Second</h1></body>";
        assert_eq!(extract_title(html), Some("First".to_string()));
    }
}
