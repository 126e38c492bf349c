//! Outbound payment integration.
//!
//! # Data Flow
//! ```text
//! submit_order handler
//!     → client.rs (POST to the payment service)
//!         → reads the task-local correlation context
//!         → stamps X-Correlation-ID on the outbound call when present
//! ```

pub mod client;
pub mod types;

pub use client::{PaymentClient, PaymentError};
pub use types::PaymentRequest;
