//! Order domain types.

use serde::{Deserialize, Serialize};

/// A listed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub name: String,
    pub price: f64,
}
