//! NiftyBot - polls intraday candles and reports confluence insights

use anyhow::{Context, Result};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use niftybot::config::AppConfig;
use niftybot::monitor::{Monitor, MonitorSettings, SnapshotReceiver};
use niftybot::oracle::YahooChartClient;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config);

    info!(config = %config.digest(), "NiftyBot starting");

    let settings = MonitorSettings::from_config(&config).context("Invalid configuration")?;
    let source = YahooChartClient::new(
        config.feed.base_url.clone(),
        Duration::from_secs(config.feed.request_timeout_secs),
    )
    .context("Failed to build chart client")?;

    let mut monitor = Monitor::new(source, settings).context("Invalid session offset")?;

    if config.output.json_snapshots {
        tokio::spawn(print_snapshots(monitor.subscribe()));
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl-C received, shutting down"),
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
        }
        let _ = shutdown_tx.send(true);
    });

    monitor.run(shutdown_rx).await?;

    info!("NiftyBot stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

/// Write each published snapshot to stdout as one JSON line
async fn print_snapshots(mut snapshots: SnapshotReceiver) {
    while snapshots.changed().await.is_ok() {
        let latest = snapshots.borrow_and_update().clone();
        let Some(snapshot) = latest else { continue };
        match serde_json::to_string(snapshot.as_ref()) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!(error = %e, "Failed to serialize snapshot"),
        }
    }
}
