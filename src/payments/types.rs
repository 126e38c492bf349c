//! Payment wire types.

use serde::{Deserialize, Serialize};

/// Payment request accepted on order submission and forwarded downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub account_number: String,
    pub amount: f64,
    pub currency: String,
}
