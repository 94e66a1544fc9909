//! Output file writer
//!
//! Writes converted markdown with the atomic temp-file-then-rename
//! pattern so readers never observe a partially written file. Optional
//! comment lines carry the source URL and generation timestamp.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tempfile::NamedTempFile;

/// Write a markdown document to `path`, creating parent directories as
/// needed.
///
/// With `source_comment` the file starts with `<!-- Source: <url> -->`;
/// with `timestamp_comment` an RFC 3339 `<!-- Generated: ... -->` line
/// follows. A blank line separates the comment block from the body.
///
/// # Errors
///
/// Returns an error if directories cannot be created or the file cannot
/// be written and renamed into place.
pub fn write_output(
    path: &Path,
    markdown: &str,
    source_url: &str,
    source_comment: bool,
    timestamp_comment: bool,
) -> Result<()> {
    let parent_dir = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Path has no parent directory"))?;
    std::fs::create_dir_all(parent_dir)
        .with_context(|| format!("Failed to create output directory {}", parent_dir.display()))?;

    let document = render_document(markdown, source_url, source_comment, timestamp_comment);

    // Temp file in the same directory as the target, then rename.
    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .with_context(|| format!("Failed to create temp file in {}", parent_dir.display()))?;
    temp_file
        .write_all(document.as_bytes())
        .with_context(|| format!("Failed to write output for {source_url}"))?;
    temp_file
        .persist(path)
        .with_context(|| format!("Failed to move output into place at {}", path.display()))?;

    log::debug!("Saved markdown for {source_url} to {}", path.display());
    Ok(())
}

fn render_document(
    markdown: &str,
    source_url: &str,
    source_comment: bool,
    timestamp_comment: bool,
) -> String {
    let mut document = String::with_capacity(markdown.len() + 128);
    if source_comment {
        document.push_str(&format!("<!-- Source: {source_url} -->\n"));
    }
    if timestamp_comment {
        document.push_str(&format!("<!-- Generated: {} -->\n", Utc::now().to_rfc3339()));
    }
    if !document.is_empty() {
        document.push('\n');
    }
    document.push_str(markdown);
    document
}
