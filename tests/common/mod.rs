//! Test utilities and helper functions for the sitescribe test suite

use anyhow::Result;
use mockito::{Mock, Server};
use std::path::Path;
use tempfile::TempDir;

use sitescribe::ScrapeConfig;

/// Creates a temporary directory for test output
#[allow(dead_code)]
pub fn create_test_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a run configuration suited to tests: small concurrency,
/// no retry delay, output under the given root
#[allow(dead_code)]
pub fn create_test_config(output_root: &Path) -> ScrapeConfig {
    ScrapeConfig::builder()
        .concurrency(2)
        .retry_delay_secs(0)
        .output_root(output_root.to_path_buf())
        .build()
        .expect("Failed to create test config")
}

/// Creates a test HTML document with specified title and body content
#[allow(dead_code)]
pub fn create_test_html(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
</head>
<body>
    {}
</body>
</html>"#,
        html_escape::encode_text(title),
        body
    )
}

/// Creates a mock endpoint that returns HTML content
#[allow(dead_code)]
pub async fn create_html_mock(server: &mut Server, path: &str, html: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
        .create_async()
        .await
}

/// Creates a mock endpoint that returns sitemap XML
#[allow(dead_code)]
pub async fn create_xml_mock(server: &mut Server, path: &str, xml: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/xml")
        .with_body(xml)
        .create_async()
        .await
}

/// Creates a mock endpoint that returns an error status
#[allow(dead_code)]
pub async fn create_error_mock(server: &mut Server, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_body("Error")
        .create_async()
        .await
}

/// Helper to create test URLs
#[allow(dead_code)]
pub fn test_url(server: &Server, path: &str) -> String {
    format!("{}{}", server.url(), path)
}
