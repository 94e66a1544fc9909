mod cli;

use anyhow::Result;
use clap::Parser;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let (config, source) = Cli::parse().into_run_config()?;

    let stats = sitescribe::scrape(config, source).await?;

    tracing::info!(
        "Run complete: {}/{} pages written, {} failed, in {:.1}s",
        stats.succeeded,
        stats.total,
        stats.failed,
        stats.elapsed.as_secs_f64()
    );

    Ok(())
}
