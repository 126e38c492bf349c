//! Lossless body capture for the logging middleware.
//!
//! A body is drained into memory once, then handed onward rebuilt from the
//! same bytes, so the handler (inbound) or the client (outbound) sees exactly
//! what was transmitted while the logger keeps its own copy.

use axum::body::{Body, Bytes};

/// Placeholder stored in log records when captured bytes cannot be decoded.
pub const UNREADABLE_BODY: &str = "[unreadable body]";

/// Error draining a body into the capture buffer.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The body exceeded the configured capture limit.
    #[error("body exceeds capture limit of {limit} bytes")]
    TooLarge { limit: usize },

    /// The underlying stream failed mid-read.
    #[error("body read failed: {0}")]
    Read(axum::Error),
}

/// A fully buffered body plus the content type it was declared with.
#[derive(Debug, Clone)]
pub struct CapturedBody {
    bytes: Bytes,
    content_type: Option<String>,
}

impl CapturedBody {
    /// Drain `body` into memory, up to `limit` bytes.
    ///
    /// `content_type` is the request/response `Content-Type` header value;
    /// it rides along for text decoding and the log record's type tag.
    pub async fn buffer(
        body: Body,
        limit: usize,
        content_type: Option<String>,
    ) -> Result<Self, CaptureError> {
        match axum::body::to_bytes(body, limit).await {
            Ok(bytes) => Ok(Self { bytes, content_type }),
            // axum reports the limit being hit as a LengthLimitError in the
            // error source chain; anything else is a genuine stream failure.
            Err(e) => {
                if find_length_limit(&e) {
                    Err(CaptureError::TooLarge { limit })
                } else {
                    Err(CaptureError::Read(e))
                }
            }
        }
    }

    /// An empty captured body, used when a request carries none.
    pub fn empty() -> Self {
        Self {
            bytes: Bytes::new(),
            content_type: None,
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Rebuild a body carrying the identical captured bytes.
    pub fn to_body(&self) -> Body {
        Body::from(self.bytes.clone())
    }

    /// Decode the captured bytes for the log record.
    ///
    /// Only UTF-8 (and charsets declaring themselves as such) decodes
    /// directly; a declared non-UTF-8 charset gets the same UTF-8 attempt as
    /// a fallback, and bytes that survive neither are replaced with
    /// [`UNREADABLE_BODY`] rather than failing the request.
    pub fn as_text(&self) -> String {
        match std::str::from_utf8(&self.bytes) {
            Ok(text) => text.to_string(),
            Err(_) => UNREADABLE_BODY.to_string(),
        }
    }
}

fn find_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<http_body_util::LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}
