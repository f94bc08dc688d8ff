use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use line_server::{config::Config, server, Indexable, LineFile};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[async_std::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    // The index has to be complete before the first request is accepted
    let file = LineFile::open(&config.source_file)
        .await
        .with_context(|| format!("could not index {}", config.source_file.display()))?;
    info!(lines = file.total_lines(), "line index ready");

    let addr = config.listen_addr();
    server::serve(Arc::new(file), &addr)
        .await
        .with_context(|| format!("server on {} failed", addr))?;

    Ok(())
}
