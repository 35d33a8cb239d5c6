//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Starting (startup.rs):
//!     Connect grid → Seed map → Bind listener → Serving
//!
//! Draining (drain.rs):
//!     Signal received → Close grid → Close listener → Stopped
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → start the drain
//! ```
//!
//! # Design Decisions
//! - Ordered startup: grid first, listener last
//! - Ordered shutdown: grid first, listener second, one shared deadline
//! - A drain that misses its deadline ends the process with a non-zero status

pub mod drain;
pub mod phase;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use drain::{drain, GracefulClose, LifecycleError};
pub use phase::{Lifecycle, Phase};
pub use shutdown::{Shutdown, ShutdownSignal};
pub use startup::{bootstrap, bootstrap_with, run, run_until, GatewayError, Running, StartupError};
