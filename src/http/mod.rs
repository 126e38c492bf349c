//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, routing, state)
//!     → middleware/request_logging.rs (capture, correlation, record)
//!     → orders handlers (may call the payments client)
//!     → captured response flushed to client
//! ```

pub mod capture;
pub mod middleware;
pub mod server;

pub use capture::CapturedBody;
pub use server::{AppState, HttpServer};
