//! Structured request/response log records.
//!
//! One record is assembled per completed request, after the response status
//! and body are final. Field names are part of the service's contract with
//! log tooling and must not drift.

use axum::http::HeaderMap;
use serde::Serialize;

/// Fixed value of the `logType` field.
pub const LOG_TYPE_REQUEST_RESPONSE: &str = "REQUEST_RESPONSE";

/// Structured record describing one request/response cycle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLogRecord {
    pub method: String,
    pub uri: String,
    /// Request headers rendered as a JSON object string.
    pub request_headers: String,
    pub request_body: String,
    pub response_status: u16,
    /// Response headers rendered as a JSON object string.
    pub response_headers: String,
    pub response_body: String,
    /// Wall-clock handling time in milliseconds.
    pub execution_time: u64,
    /// Request `Content-Type`, empty when absent.
    pub request_type: String,
    pub correlation_id: String,
    pub log_type: &'static str,
}

/// Render a header map as a JSON object string for the log record.
///
/// Header values that are not valid UTF-8 are replaced lossily; a header
/// can never prevent the record from being built.
pub fn headers_as_json(headers: &HeaderMap) -> String {
    let map: serde_json::Map<String, serde_json::Value> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                serde_json::Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
            )
        })
        .collect();
    serde_json::Value::Object(map).to_string()
}

/// Append-only sink for completed-request records.
///
/// Implementations must be safe for concurrent writers; the middleware calls
/// `emit` from every request's task. Failures inside a sink must be contained
/// there, never surfaced to the client.
pub trait LogSink: Send + Sync {
    fn emit(&self, record: &RequestLogRecord);
}

/// Production sink: one `tracing` event per record, with the record's exact
/// field names.
#[derive(Debug, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn emit(&self, record: &RequestLogRecord) {
        tracing::info!(
            target: "order_gateway::request_log",
            method = %record.method,
            uri = %record.uri,
            requestHeaders = %record.request_headers,
            requestBody = %record.request_body,
            responseStatus = record.response_status,
            responseHeaders = %record.response_headers,
            responseBody = %record.response_body,
            executionTime = record.execution_time,
            requestType = %record.request_type,
            correlationId = %record.correlation_id,
            logType = %record.log_type,
            "Request and response logged"
        );
    }
}

/// Sink decorator that downgrades serialization problems to stderr.
///
/// `RequestLogRecord` is all strings and integers, so serialization cannot
/// fail today; the guard exists so a future field type cannot turn a logging
/// problem into a request failure.
pub fn emit_guarded(sink: &dyn LogSink, record: &RequestLogRecord) {
    if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.emit(record))) {
        eprintln!(
            "order-gateway: log sink failed for correlation id {}: {:?}",
            record.correlation_id, e
        );
    }
}
