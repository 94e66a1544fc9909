//! HTML to markdown conversion
//!
//! Thin layer over htmd: maps the run's declarative conversion options
//! onto htmd's option set and registers custom handlers for the emphasis
//! and strong delimiters, which htmd does not expose as options. Empty
//! conversion output is reported as a failure.

use anyhow::{Context, Result, bail};
use htmd::{
    Element, HtmlToMarkdown,
    element_handler::{HandlerResult, Handlers},
};
use serde::{Deserialize, Serialize};

/// Heading rendering style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    /// `# Heading`
    #[default]
    Atx,
    /// Underlined with `=` / `-`
    Setext,
}

/// Horizontal rule marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HrMarker {
    #[default]
    Dashes,
    Asterisks,
    Underscores,
}

/// Unordered list bullet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletMarker {
    #[default]
    Asterisk,
    Dash,
}

/// Code block rendering style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeBlockStyle {
    /// Triple-backtick fences
    #[default]
    Fenced,
    /// Four-space indentation
    Indented,
}

/// Delimiter for `<em>`/`<i>` content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmphasisDelimiter {
    #[default]
    Underscore,
    Asterisk,
}

impl EmphasisDelimiter {
    #[must_use]
    pub const fn as_markdown(self) -> &'static str {
        match self {
            Self::Underscore => "_",
            Self::Asterisk => "*",
        }
    }
}

/// Delimiter for `<strong>`/`<b>` content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrongDelimiter {
    #[default]
    Asterisk,
    Underscore,
}

impl StrongDelimiter {
    #[must_use]
    pub const fn as_markdown(self) -> &'static str {
        match self {
            Self::Asterisk => "**",
            Self::Underscore => "__",
        }
    }
}

/// Link rendering style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// `[text](url)`
    #[default]
    Inlined,
    /// `[text][n]` with a reference list at the end
    Referenced,
}

/// Configuration options for HTML to markdown conversion
///
/// Passed unchanged to the conversion engine; immutable and shared by
/// all workers for the duration of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionOptions {
    pub heading_style: HeadingStyle,
    pub hr_marker: HrMarker,
    pub bullet_marker: BulletMarker,
    pub code_block_style: CodeBlockStyle,
    pub emphasis_delimiter: EmphasisDelimiter,
    pub strong_delimiter: StrongDelimiter,
    pub link_style: LinkStyle,
}

/// Build an htmd converter configured from `options`.
///
/// Custom handlers:
/// - `<em>`/`<i>`: configurable delimiter, whitespace kept outside the markers
/// - `<strong>`/`<b>`: same, with the doubled delimiter
#[must_use]
pub fn build_converter(options: &ConversionOptions) -> HtmlToMarkdown {
    let em_delimiter = options.emphasis_delimiter.as_markdown();
    let strong_delimiter = options.strong_delimiter.as_markdown();

    HtmlToMarkdown::builder()
        .options(to_htmd_options(options))
        .add_handler(
            vec!["em", "i"],
            move |handlers: &dyn Handlers, element: Element| {
                let content = handlers.walk_children(element.node).content;
                Some(HandlerResult::from(wrap_delimited(&content, em_delimiter)))
            },
        )
        .add_handler(
            vec!["strong", "b"],
            move |handlers: &dyn Handlers, element: Element| {
                let content = handlers.walk_children(element.node).content;
                Some(HandlerResult::from(wrap_delimited(
                    &content,
                    strong_delimiter,
                )))
            },
        )
        .build()
}

/// Convert an HTML document to markdown.
///
/// # Errors
///
/// Returns an error if the conversion engine fails or produces
/// empty/whitespace-only output.
pub fn convert_to_markdown(html: &str, options: &ConversionOptions) -> Result<String> {
    let converter = build_converter(options);
    let markdown = converter
        .convert(html)
        .context("HTML to markdown conversion failed")?;

    if markdown.trim().is_empty() {
        bail!("Conversion produced empty markdown output");
    }

    Ok(markdown)
}

fn to_htmd_options(options: &ConversionOptions) -> htmd::options::Options {
    use htmd::options as ho;

    ho::Options {
        heading_style: match options.heading_style {
            HeadingStyle::Atx => ho::HeadingStyle::Atx,
            HeadingStyle::Setext => ho::HeadingStyle::Setex,
        },
        hr_style: match options.hr_marker {
            HrMarker::Dashes => ho::HrStyle::Dashes,
            HrMarker::Asterisks => ho::HrStyle::Asterisks,
            HrMarker::Underscores => ho::HrStyle::Underscores,
        },
        bullet_list_marker: match options.bullet_marker {
            BulletMarker::Asterisk => ho::BulletListMarker::Asterisk,
            BulletMarker::Dash => ho::BulletListMarker::Dash,
        },
        code_block_style: match options.code_block_style {
            CodeBlockStyle::Fenced => ho::CodeBlockStyle::Fenced,
            CodeBlockStyle::Indented => ho::CodeBlockStyle::Indented,
        },
        link_style: match options.link_style {
            LinkStyle::Inlined => ho::LinkStyle::Inlined,
            LinkStyle::Referenced => ho::LinkStyle::Referenced,
        },
        ..ho::Options::default()
    }
}

/// Wrap trimmed content in a delimiter pair, keeping any leading and
/// trailing whitespace outside the markers. Whitespace-only content
/// collapses to nothing rather than producing bare delimiters.
fn wrap_delimited(content: &str, delimiter: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let leading = &content[..content.len() - content.trim_start().len()];
    let trailing = &content[content.trim_end().len()..];
    format!("{leading}{delimiter}{trimmed}{delimiter}{trailing}")
}
