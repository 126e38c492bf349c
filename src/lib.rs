//! Order Gateway Library

pub mod config;
pub mod correlation;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod orders;
pub mod payments;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
