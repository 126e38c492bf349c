//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): total requests by method, status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_payment_calls_total` (counter): outbound payment calls by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics::Label;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed inbound request.
pub fn record_request(method: &str, status: u16, start_time: Instant) {
    let labels = vec![
        Label::new("method", method.to_string()),
        Label::new("status", status.to_string()),
    ];
    metrics::counter!("gateway_requests_total", labels.clone()).increment(1);
    metrics::histogram!("gateway_request_duration_seconds", labels)
        .record(start_time.elapsed().as_secs_f64());
}

/// Record one outbound payment call.
pub fn record_payment_call(success: bool) {
    let labels = vec![Label::new("outcome", if success { "ok" } else { "error" })];
    metrics::counter!("gateway_payment_calls_total", labels).increment(1);
}
