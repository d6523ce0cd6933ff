//! Olympic statistics dashboard service.
//!
//! Loads the Olympic payload once, keeps it as an in-memory snapshot and
//! serves dashboard and per-country aggregates as chart-ready JSON.
//!
//! # Architecture Overview
//!
//! ```text
//!   olympic.json (file or URL)
//!        │
//!        ▼
//!   ┌──────────────┐  watch   ┌──────────────────┐      ┌──────────────┐
//!   │ source::     │ ───────▶ │ dashboard::      │ ───▶ │ http::       │ ───▶ client
//!   │ OlympicSvc   │ {snapshot│ summary / detail │      │ handlers     │
//!   └──────────────┘ loading} └──────────────────┘      └──────────────┘
//!        ▲
//!        │ reload (POST /api/reload, source watcher)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use olympic_dashboard::config::loader::load_config_or_default;
use olympic_dashboard::lifecycle::{signals, Shutdown};
use olympic_dashboard::observability::{logging, metrics};
use olympic_dashboard::source::watcher::{drive_reloads, SourceWatcher};
use olympic_dashboard::{HttpServer, OlympicService};

#[derive(Parser)]
#[command(name = "olympic-dashboard")]
#[command(about = "Serves Olympic medal statistics for the dashboard", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "dashboard.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config_or_default(&args.config)?;

    logging::init_logging(&config.observability);
    tracing::info!("olympic-dashboard v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        source = %config.source.location,
        request_timeout_secs = config.source.request_timeout_secs,
        simulated_delay_ms = config.source.simulated_delay_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let service = Arc::new(OlympicService::from_config(&config.source)?);

    tokio::spawn({
        let service = service.clone();
        async move {
            service.load_initial_data().await;
        }
    });

    // Keep the watcher alive for the lifetime of the server.
    let _source_watcher = if config.source.watch {
        match service.fetcher().source().watch_path() {
            Some(path) => {
                let (watcher, changes) = SourceWatcher::new(path);
                match watcher.run() {
                    Ok(handle) => {
                        tokio::spawn(drive_reloads(service.clone(), changes, shutdown.subscribe()));
                        Some(handle)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Source watcher unavailable, reloads are manual only");
                        None
                    }
                }
            }
            None => {
                tracing::warn!("source.watch is set but the source is not a local file");
                None
            }
        }
    } else {
        None
    };

    let tls = config.listener.tls.clone();
    let server = HttpServer::new(config, service);

    match tls {
        Some(tls) => server.run_tls(&tls, shutdown.subscribe()).await?,
        None => {
            let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            server.run(listener, shutdown.subscribe()).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
