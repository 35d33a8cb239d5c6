//! HTTP gateway for key-value maps hosted by a data grid.

pub mod config;
pub mod grid;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod service;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
