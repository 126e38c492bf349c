//! Correlation ID resolution and generation.

use axum::http::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Header carrying the correlation ID, on inbound requests, outbound calls,
/// and responses alike.
pub const X_CORRELATION_ID: &str = "x-correlation-id";

/// Opaque token identifying one inbound request across service boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Resolve the correlation ID for an inbound request.
    ///
    /// A non-empty `X-Correlation-ID` header is used verbatim so traces
    /// started by an upstream service stay connected; otherwise a fresh
    /// ID is generated.
    pub fn resolve(headers: &HeaderMap) -> Self {
        headers
            .get(X_CORRELATION_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| Self(v.to_string()))
            .unwrap_or_else(Self::generate)
    }

    /// Generate a fresh globally-unique ID (UUID v4, hyphenated text form).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the ID as a header value.
    ///
    /// Inbound IDs originate from a header and generated IDs are plain
    /// ASCII, so conversion only fails for hostile input; fall back to a
    /// fresh UUID rather than dropping the header.
    pub fn header_value(&self) -> HeaderValue {
        HeaderValue::from_str(&self.0)
            .unwrap_or_else(|_| HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap())
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
