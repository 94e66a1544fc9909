pub mod config;
pub mod content_saver;
pub mod fetch;
pub mod markdown;
pub mod pipeline;
pub mod rewrite;
pub mod sitemap;
pub mod source;
pub mod utils;

pub use config::{ScrapeConfig, ScrapeConfigBuilder};
pub use content_saver::{PathPolicy, ResolvedPath, map_path, write_output};
pub use fetch::PageFetcher;
pub use markdown::{ConversionOptions, convert_to_markdown};
pub use pipeline::{JobError, PageJob, RunStats};
pub use rewrite::{RewriteRules, extract_title, rewrite_html};
pub use sitemap::{SitemapNode, parse_sitemap, resolve_sitemap};
pub use source::UrlSource;

/// Resolve the URL source and run the full pipeline over it.
pub async fn scrape(config: ScrapeConfig, source: UrlSource) -> anyhow::Result<RunStats> {
    let urls = source.load(&config).await?;
    pipeline::run(urls, &config).await
}
