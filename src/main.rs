// SPDX-License-Identifier: MIT

//! Esclavizador CLI entry point.

use clap::Parser;
use esclavizador::cli::{self, Cli};
use esclavizador::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    tracing::debug!(api = %config.api_base_url, "Configuration loaded");

    cli::run(cli, config).await
}

/// Initialize logging; quiet by default, tuned via `RUST_LOG`.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(format)
        .init();
}
