//! Data grid integration.
//!
//! # Data Flow
//! ```text
//! http::entry handler
//!     → GridClient::list_objects (existence check, GET only)
//!     → GridClient::get_map
//!     → DistributedMap::get / put
//!
//! lifecycle::drain
//!     → GridClient::close
//! ```
//!
//! # Design Decisions
//! - The gateway keeps no copy of map contents
//! - One client handle per process, injected into handlers via `AppState`

pub mod client;
pub mod memory;
pub mod remote;
pub mod types;

pub use client::{connect, DistributedMap, GridClient};
pub use memory::MemoryGrid;
pub use remote::RemoteGrid;
pub use types::{GridError, GridResult, ObjectDescriptor, Value, MAP_SERVICE};
