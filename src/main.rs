//! Order Gateway (v1)
//!
//! A small order service built with Tokio and Axum, instrumented with
//! request/response logging and correlation-ID propagation.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌────────────────────────────────────────────────┐
//!                       │                 ORDER GATEWAY                   │
//!                       │                                                 │
//!     Client Request    │  ┌──────────────┐    ┌─────────┐    ┌────────┐ │
//!     ──────────────────┼─▶│ request      │───▶│  http   │───▶│ orders │ │
//!                       │  │ logging      │    │ server  │    │handlers│ │
//!                       │  │ middleware   │    └─────────┘    └───┬────┘ │
//!                       │  └──────┬───────┘                       │      │
//!                       │         │ correlation context           ▼      │
//!                       │         │ (task-local)           ┌──────────┐  │
//!     Client Response   │         ▼                        │ payments │──┼──▶ Payment
//!     ◀─────────────────┼── structured log record          │  client  │  │    Service
//!                       │   + X-Correlation-ID header      └──────────┘  │
//!                       │                                                 │
//!                       │  ┌───────────────────────────────────────────┐ │
//!                       │  │           Cross-Cutting Concerns           │ │
//!                       │  │  ┌────────┐ ┌─────────────┐ ┌───────────┐ │ │
//!                       │  │  │ config │ │observability│ │ lifecycle │ │ │
//!                       │  │  └────────┘ └─────────────┘ └───────────┘ │ │
//!                       │  └───────────────────────────────────────────┘ │
//!                       └────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use order_gateway::config::loader::load_config;
use order_gateway::config::ServiceConfig;
use order_gateway::http::HttpServer;
use order_gateway::lifecycle::Shutdown;

#[derive(Parser, Debug)]
#[command(name = "order-gateway", about = "Order service with request/response logging")]
struct Cli {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("order-gateway v0.1.0 starting");

    let cli = Cli::parse();
    let config = match cli.config {
        Some(path) => load_config(&path)?,
        None => ServiceConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        payment_url = %config.payment.service_url,
        max_concurrent_requests = config.listener.max_concurrent_requests,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Metrics endpoint
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            order_gateway::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Create and run HTTP server
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
