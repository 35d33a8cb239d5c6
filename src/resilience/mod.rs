//! Resilience subsystem.
//!
//! # Design Decisions
//! - Every grid call runs under a deadline
//! - No retries: a failed call is reported to the client as is

pub mod timeouts;

pub use timeouts::bounded;
