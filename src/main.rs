//! Multi-account transaction sender
//!
//! Sends one fixed contract call from each configured account, one account at
//! a time, routing every account through its own proxy and user-agent.

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod account;
mod chain;
mod config;
mod driver;
mod error;
mod tx;

use chain::HttpConnector;
use config::{LoggingConfig, Settings};
use driver::Driver;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Keys usually live in .env as WALLET<n>_KEY
    dotenv().ok();

    // Load configuration
    let settings = Arc::new(Settings::load()?);

    // Initialize logging; the guard flushes the file writer on exit
    let _guard = init_logging(&settings.logging)?;

    info!("Starting multi-tx-sender v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Loaded {} accounts for chain {} ({})",
        settings.accounts.len(),
        settings.chain.chain_id,
        settings.chain.rpc_url
    );

    let connector = HttpConnector::new(&settings.chain);
    let driver = Driver::new(settings.clone(), connector);
    let summary = driver.run().await;

    if summary.success == 0 {
        warn!(
            "None of the {} accounts completed successfully",
            summary.total()
        );
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,multi_tx_sender=debug,hyper=warn,reqwest=warn")
    });

    let directory = config
        .file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = config
        .file
        .file_name()
        .with_context(|| format!("Log file path has no file name: {:?}", config.file))?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));

    let timestamp = || fmt::time::ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_timer(timestamp()).with_target(false))
        .with(
            fmt::layer()
                .with_timer(timestamp())
                .with_target(false)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}
