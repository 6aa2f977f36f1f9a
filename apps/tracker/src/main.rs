//! Learning tracker CLI
//!
//! Opens the configured task store and runs one operation against it:
//! listing the plan, replacing it, or editing a single day.

use anyhow::Context;
use clap::Parser;
use task_store::TaskTracker;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;

use cli::Cli;
use config::TrackerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config =
        TrackerConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(backend) = cli.backend {
        config.store.backend = backend;
    }

    // Initialize tracing
    let log_level = match config.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("tracker={log_level},task_store={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        backend = %config.store.backend,
        "Starting tracker"
    );

    let tracker = TaskTracker::open(&config.store)
        .await
        .context("Failed to open task store")?;

    commands::run(&tracker, cli.command, &mut std::io::stdout().lock()).await
}
