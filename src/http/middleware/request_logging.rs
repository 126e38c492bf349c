//! Request/response logging middleware.
//!
//! Outermost layer of the router. For every request it:
//! 1. buffers the inbound body (bounded) and rebuilds the request,
//! 2. resolves the correlation ID and opens a task-local request context,
//! 3. runs the downstream handler inside that context,
//! 4. buffers the response body, stamps `X-Correlation-ID` on the response,
//! 5. emits exactly one structured log record,
//! 6. returns the response rebuilt from the captured bytes.
//!
//! Handler failures, 404 fallbacks, and timeout responses from the inner
//! `TimeoutLayer` all arrive here as plain responses. Cancellation — the
//! client disconnecting while the handler is in flight, which drops this
//! future mid-await — is covered by [`EmissionGuard`]: its `Drop` emits the
//! record with an error status when no response ever materialized, so the
//! one-record-per-request guarantee holds on every path. The context ends
//! with the scope in step 3; nothing request-scoped survives into the next
//! request on this worker.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, Response, StatusCode},
    middleware::Next,
    response::IntoResponse,
};

use crate::correlation::{self, CorrelationId, RequestContext, X_CORRELATION_ID};
use crate::http::capture::{CaptureError, CapturedBody};
use crate::http::server::AppState;
use crate::observability::logging::{
    emit_guarded, headers_as_json, LogSink, RequestLogRecord, LOG_TYPE_REQUEST_RESPONSE,
};
use crate::observability::metrics;

/// Status recorded when the client goes away before a response exists.
/// 499 is the conventional "client closed request" code.
const STATUS_CLIENT_CLOSED_REQUEST: u16 = 499;

pub async fn request_logging_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let limit = state.capture.max_body_bytes;

    let (parts, body) = request.into_parts();
    let correlation_id = CorrelationId::resolve(&parts.headers);
    // The context owns the start timestamp; all timing below derives from it.
    let ctx = RequestContext::new(correlation_id.clone());
    let request_type = content_type_of(&parts.headers).unwrap_or_default();

    let mut guard = EmissionGuard::new(&state, &parts, request_type.clone(), ctx.clone());

    // Buffer the inbound body so the handler and the log record both see the
    // full, identical byte sequence.
    let request_body = match CapturedBody::buffer(body, limit, Some(request_type)).await {
        Ok(captured) => captured,
        Err(e) => {
            // The handler never ran; log the rejection and answer directly.
            let status = match e {
                CaptureError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                CaptureError::Read(_) => StatusCode::BAD_REQUEST,
            };
            tracing::warn!(correlation_id = %correlation_id, error = %e, "Request body capture failed");
            let response = reject(status, &correlation_id);
            guard.complete(&response, &CapturedBody::empty());
            return response;
        }
    };
    guard.request_body = request_body.clone();

    let request = Request::from_parts(parts, request_body.to_body());

    // Run the handler inside the correlation scope. Scope exit is the
    // context cleanup; it cannot be skipped by an error response.
    let response = correlation::scope(ctx, next.run(request)).await;

    let (mut parts, body) = response.into_parts();
    parts
        .headers
        .insert(X_CORRELATION_ID, correlation_id.header_value());
    let response_type = content_type_of(&parts.headers);

    // Buffer the emitted response; the client receives these exact bytes,
    // flushed once, after the record is built.
    let response_body = match CapturedBody::buffer(body, limit, response_type).await {
        Ok(captured) => captured,
        Err(e) => {
            tracing::error!(correlation_id = %correlation_id, error = %e, "Response body capture failed");
            let response = reject(StatusCode::INTERNAL_SERVER_ERROR, &correlation_id);
            guard.complete(&response, &CapturedBody::empty());
            return response;
        }
    };

    let response = Response::from_parts(parts, response_body.to_body());
    guard.complete(&response, &response_body);
    response
}

/// Owns the obligation to emit exactly one record for one request.
///
/// Every return path of the middleware calls [`complete`](Self::complete)
/// with the final response. If the request future is dropped before that —
/// client disconnect or a panicking handler — `Drop` emits the record with
/// [`STATUS_CLIENT_CLOSED_REQUEST`] instead, so cancellation cannot lose
/// the log.
struct EmissionGuard {
    sink: Arc<dyn LogSink>,
    method: String,
    uri: String,
    request_headers: HeaderMap,
    request_body: CapturedBody,
    request_type: String,
    ctx: RequestContext,
    emitted: bool,
}

impl EmissionGuard {
    fn new(
        state: &AppState,
        parts: &axum::http::request::Parts,
        request_type: String,
        ctx: RequestContext,
    ) -> Self {
        Self {
            sink: state.log_sink.clone(),
            method: parts.method.to_string(),
            uri: parts.uri.to_string(),
            request_headers: parts.headers.clone(),
            request_body: CapturedBody::empty(),
            request_type,
            ctx,
            emitted: false,
        }
    }

    /// Emit the record for a finalized response. Disarms the drop path.
    fn complete(mut self, response: &Response<Body>, response_body: &CapturedBody) {
        self.emitted = true;
        self.emit(
            response.status().as_u16(),
            headers_as_json(response.headers()),
            response_body.as_text(),
        );
    }

    fn emit(&self, status: u16, response_headers: String, response_body: String) {
        let record = RequestLogRecord {
            method: self.method.clone(),
            uri: self.uri.clone(),
            request_headers: headers_as_json(&self.request_headers),
            request_body: self.request_body.as_text(),
            response_status: status,
            response_headers,
            response_body,
            execution_time: self.ctx.started_at().elapsed().as_millis() as u64,
            request_type: self.request_type.clone(),
            correlation_id: self.ctx.correlation_id().as_str().to_string(),
            log_type: LOG_TYPE_REQUEST_RESPONSE,
        };
        emit_guarded(self.sink.as_ref(), &record);
        metrics::record_request(&self.method, status, self.ctx.started_at());
    }
}

impl Drop for EmissionGuard {
    fn drop(&mut self) {
        if !self.emitted {
            self.emit(STATUS_CLIENT_CLOSED_REQUEST, "{}".to_string(), String::new());
        }
    }
}

fn reject(status: StatusCode, correlation_id: &CorrelationId) -> Response<Body> {
    let mut response = status.into_response();
    response
        .headers_mut()
        .insert(X_CORRELATION_ID, correlation_id.header_value());
    response
}

fn content_type_of(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}
