//! Correlation ID tracking subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request headers
//!     → id.rs (reuse X-Correlation-ID, or generate UUID v4)
//!     → context.rs (task-local RequestContext for the handling scope)
//!     → read by any code running inside the request, notably the
//!       payments client when it stamps outbound calls
//!     → scope exit drops the context; nothing survives the request
//! ```
//!
//! # Design Decisions
//! - Context lives in `tokio::task_local!` storage, never a shared map,
//!   so concurrent requests cannot observe each other's IDs
//! - Reading the context outside a request yields `None`, not an error

pub mod context;
pub mod id;

pub use context::{current_correlation_id, scope, RequestContext};
pub use id::{CorrelationId, X_CORRELATION_ID};
