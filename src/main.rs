//! Content aggregator service.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────────┐
//!                      │                 CONTENT AGGREGATOR                    │
//!                      │                                                       │
//!   GET /sitemap.xml   │  ┌─────────┐    ┌──────────┐    ┌────────────────┐   │
//!   GET /api/pages/*   ┼─▶│  http   │───▶│ sitemap  │───▶│   aggregate    │   │
//!   GET /api/footer-*  │  │ server  │    │  pages   │    │ (fan-out/in)   │   │
//!                      │  └─────────┘    │ settings │    └───────┬────────┘   │
//!                      │                 └──────────┘            │            │
//!                      │                                         ▼            │
//!                      │  ┌─────────┐                    ┌────────────────┐   │    Content
//!                      │  │ content │◀───────────────────│   upstream     │◀──┼──── API
//!                      │  │normalize│                    │ client+timeout │   │
//!                      │  └─────────┘                    └────────────────┘   │
//!                      │                                                       │
//!                      │  config · observability · lifecycle                  │
//!                      └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use content_aggregator::config::{load_config, validate_config, AppConfig, ConfigError};
use content_aggregator::observability::{logging, metrics};
use content_aggregator::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "content-aggregator", version, about = "Content aggregation service")]
struct Args {
    /// Path to a TOML config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let config = AppConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            config
        }
    };

    logging::init_tracing(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "content-aggregator starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        site_url = %config.sitemap.site_url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
