//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, query and header checks)
//!     → entry.rs / config.rs (handlers, grid calls)
//!     → response.rs (JSON bodies, status mapping)
//!     → Send to client
//! ```

pub mod config;
pub mod entry;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MapParams, X_REQUEST_ID};
pub use response::{ApiError, Entry, Message, NO_MAP, NO_VALUE};
pub use server::{AppState, HttpServer, ServerHandle};
