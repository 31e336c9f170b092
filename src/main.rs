use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod advisory;
mod bot;
mod config;
mod console;
mod error;
mod feed;
mod scout;

use advisory::{AdvisoryClient, AdvisoryConfig};
use bot::{CooldownRegistry, Scanner, Scheduler};
use config::Config;
use console::ConsoleSink;
use feed::Flashscore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    console::print_banner(config.poll_interval_secs, config.cooldown_minutes);

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let feed = Arc::new(Flashscore::new(
        &config.rapidapi_key,
        &config.rapidapi_host,
        config.feed_base_url.as_deref(),
        timeout,
    )?);
    let oracle = Arc::new(AdvisoryClient::new(AdvisoryConfig {
        api_key: config.gemini_api_key.clone(),
        base_url: config.gemini_api_url.clone(),
        model: config.gemini_model.clone(),
        timeout_secs: config.request_timeout_secs,
    })?);

    let scanner = Scanner::new(
        feed,
        oracle,
        Arc::new(ConsoleSink),
        CooldownRegistry::new(chrono::Duration::minutes(config.cooldown_minutes)),
        config.confidence_threshold,
        Duration::from_millis(config.advisory_delay_ms),
    );

    // Ctrl-C flips the shutdown flag; the scheduler drains cleanly from Idle.
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping after the current cycle");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                warn!("Failed to listen for Ctrl-C: {}", e);
                // Keep the sender alive so the scheduler runs on
                std::future::pending::<()>().await;
            }
        }
    });

    let scheduler = Scheduler::new(
        scanner,
        Duration::from_secs(config.poll_interval_secs),
        Duration::from_secs(config.error_backoff_secs),
        shutdown_rx,
    );
    scheduler.run().await;

    info!("Stopped");
    Ok(())
}
