//! Crescendo Server - standalone headless server for Crescendo.
//!
//! Exposes the per-room playback queues over HTTP and streams room events to
//! WebSocket clients. References are resolved with `yt-dlp`; audio goes to
//! the simulated output, which plays each track for a fixed duration.

mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crescendo_core::{bootstrap_services, start_server, SimulatedConnector, YtDlpResolver};
use tokio::signal;

use crate::config::ServerConfig;

/// Crescendo Server - per-room media queue server.
#[derive(Parser, Debug)]
#[command(name = "crescendo-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (YAML).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(short, long, default_value = "info", env = "CRESCENDO_LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// Bind port (overrides config file).
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Path to the yt-dlp executable (overrides config file).
    #[arg(long, value_name = "PATH")]
    ytdlp: Option<PathBuf>,

    /// Seconds each track plays on the simulated output (overrides config file).
    #[arg(long, value_name = "SECS")]
    simulated_track_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .format_timestamp_millis()
        .init();

    log::info!("Crescendo Server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config =
        ServerConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Apply CLI overrides
    if let Some(port) = args.port {
        config.bind_port = port;
    }
    if let Some(ytdlp) = args.ytdlp {
        config.ytdlp_path = ytdlp;
    }
    if let Some(secs) = args.simulated_track_secs {
        config.simulated_track_secs = secs;
    }

    log::info!(
        "Configuration: bind={}, yt-dlp={}, simulated track length={}s, auto-leave={}",
        config.bind_addr(),
        config.ytdlp_path.display(),
        config.simulated_track_secs,
        config.playback.auto_leave_on_empty
    );

    let resolver = Arc::new(YtDlpResolver::new(config.ytdlp_path.clone()));
    let connector = Arc::new(SimulatedConnector::new(Duration::from_secs(
        config.simulated_track_secs,
    )));

    let services = bootstrap_services(&config.playback, resolver, connector)
        .context("Failed to bootstrap services")?;

    log::info!("Services bootstrapped successfully");

    services.start_background_tasks();

    // The server stops accepting connections once the services are cancelled.
    let app_state = services.app_state();
    let addr = config.bind_addr();
    let shutdown = services.cancel_token.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(app_state, addr, shutdown).await {
            log::error!("Server error: {}", e);
        }
    });

    // Wait for shutdown signal
    shutdown_signal().await;

    log::info!("Shutdown signal received, cleaning up...");

    // Graceful shutdown
    services.shutdown().await;

    if let Err(e) = server_handle.await {
        log::warn!("Server task ended abnormally: {}", e);
    }

    log::info!("Shutdown complete");
    Ok(())
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
