//! Axum handlers for the order endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::http::server::AppState;
use crate::orders::model::Order;
use crate::payments::types::PaymentRequest;
use crate::payments::PaymentError;

/// `GET /orders` — static catalogue listing.
pub async fn list_orders() -> Json<Vec<Order>> {
    Json(vec![
        Order {
            id: 1,
            name: "book".to_string(),
            price: 1234.0,
        },
        Order {
            id: 2,
            name: "cars".to_string(),
            price: 1224.0,
        },
        Order {
            id: 3,
            name: "disk".to_string(),
            price: 1244.0,
        },
    ])
}

/// `POST /api/orders/submit` — forward the payment request downstream.
///
/// Exactly one outbound call per invocation; its failure is reported to the
/// caller, not retried here.
pub async fn submit_order(
    State(state): State<AppState>,
    Json(payment_request): Json<PaymentRequest>,
) -> Result<&'static str, AppError> {
    state.payment_client.submit(&payment_request).await?;
    Ok("Order submitted successfully.")
}

/// Handler-level error, converted to a response by axum.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("payment service call failed: {0}")]
    Payment(#[from] PaymentError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Payment(e) => {
                tracing::error!(error = %e, "Order submission failed");
                (StatusCode::BAD_GATEWAY, "Payment service unavailable").into_response()
            }
        }
    }
}
