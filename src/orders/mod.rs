//! Order endpoints.
//!
//! Thin glue from the middleware's point of view: a listing endpoint and a
//! submission endpoint that makes exactly one outbound payment call.

pub mod handlers;
pub mod model;

pub use model::Order;
