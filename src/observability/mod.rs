//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Logging middleware produces:
//!     → logging.rs (one structured record per completed request)
//!     → metrics.rs (request counter, latency histogram)
//!
//! Consumers:
//!     → Log aggregation (stdout via tracing, or an injected sink)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured records carry fixed keys so downstream parsers stay simple
//! - The sink is a trait object; tests swap in a recording sink
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;

pub use logging::{LogSink, RequestLogRecord, TracingLogSink};
