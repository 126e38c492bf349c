//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the order handlers
//! - Wire up middleware (request logging outermost, then timeout, trace)
//! - Bind server to listener, serve with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::schema::CaptureConfig;
use crate::config::ServiceConfig;
use crate::http::middleware::request_logging_middleware;
use crate::observability::logging::{LogSink, TracingLogSink};
use crate::orders;
use crate::payments::PaymentClient;

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub payment_client: Arc<PaymentClient>,
    pub log_sink: Arc<dyn LogSink>,
    pub capture: CaptureConfig,
}

/// HTTP server for the order gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and the
    /// default tracing-backed log sink.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_log_sink(config, Arc::new(TracingLogSink))
    }

    /// Create a server with an explicit log sink. Tests inject a recording
    /// sink here to assert on emitted records.
    pub fn with_log_sink(config: ServiceConfig, log_sink: Arc<dyn LogSink>) -> Self {
        let payment_client = Arc::new(PaymentClient::new(
            config.payment.service_url.clone(),
            Duration::from_secs(config.timeouts.outbound_secs),
        ));

        let state = AppState {
            payment_client,
            log_sink,
            capture: config.capture,
        };

        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layer order matters: the logging middleware is added last so it runs
    /// outermost and observes timeout responses produced by `TimeoutLayer`;
    /// the timeout sits outside the concurrency limit so a request stuck
    /// waiting for a slot still times out (and gets logged).
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/orders", get(orders::handlers::list_orders))
            .route("/api/orders/submit", post(orders::handlers::submit_order))
            .with_state(state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(GlobalConcurrencyLimitLayer::new(
                config.listener.max_concurrent_requests,
            ))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(from_fn_with_state(state, request_logging_middleware))
    }

    /// Run the server, accepting connections on the given listener until
    /// Ctrl+C or the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for Ctrl+C or a programmatic shutdown trigger.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if result.is_ok() {
                tracing::info!("Shutdown signal received");
            }
        }
        _ = shutdown.recv() => {
            tracing::info!("Shutdown triggered");
        }
    }
}
