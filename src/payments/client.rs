//! HTTP client for the downstream payment service.

use std::time::Duration;

use crate::correlation::{self, X_CORRELATION_ID};
use crate::observability::metrics;
use crate::payments::types::PaymentRequest;

/// Error from an outbound payment call.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("payment service answered {0}")]
    Status(reqwest::StatusCode),
}

/// Client for the payment service.
///
/// Every call is stamped with the active request's correlation ID, read from
/// the task-local context. Calls made outside a request scope simply go out
/// without the header.
pub struct PaymentClient {
    client: reqwest::Client,
    service_url: String,
}

impl PaymentClient {
    /// Build the client. Panics at startup if the underlying HTTP client
    /// cannot be constructed; running without the configured timeout is not
    /// an acceptable fallback.
    pub fn new(service_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("payment HTTP client construction failed");
        Self {
            client,
            service_url,
        }
    }

    /// POST one payment request downstream.
    pub async fn submit(&self, request: &PaymentRequest) -> Result<(), PaymentError> {
        let mut builder = self.client.post(&self.service_url).json(request);

        if let Some(correlation_id) = correlation::current_correlation_id() {
            tracing::info!(
                correlation_id = %correlation_id,
                url = %self.service_url,
                "Submitting order"
            );
            builder = builder.header(X_CORRELATION_ID, correlation_id.as_str());
        } else {
            tracing::info!(url = %self.service_url, "Submitting order without correlation context");
        }

        let result = builder.send().await;
        match result {
            Ok(response) if response.status().is_success() => {
                metrics::record_payment_call(true);
                tracing::info!("Order submitted successfully");
                Ok(())
            }
            Ok(response) => {
                metrics::record_payment_call(false);
                Err(PaymentError::Status(response.status()))
            }
            Err(e) => {
                metrics::record_payment_call(false);
                Err(PaymentError::Transport(e))
            }
        }
    }
}
