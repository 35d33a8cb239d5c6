//! Grid types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Service kind the grid reports for distributed maps.
pub const MAP_SERVICE: &str = "hz:impl:mapService";

/// Opaque value stored in a distributed map.
pub type Value = serde_json::Value;

/// Metadata about one object hosted by the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDescriptor {
    /// Object name (the map name for maps).
    pub name: String,
    /// Service kind, e.g. [`MAP_SERVICE`].
    pub service_name: String,
}

impl ObjectDescriptor {
    /// Descriptor for a distributed map.
    pub fn map(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            service_name: MAP_SERVICE.to_string(),
        }
    }

    /// True if this describes the map called `name`.
    pub fn is_map_named(&self, name: &str) -> bool {
        self.service_name == MAP_SERVICE && self.name == name
    }
}

/// Errors that can occur while talking to the grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// The member could not be reached.
    #[error("grid unreachable: {0}")]
    Unreachable(String),

    /// The client has been shut down.
    #[error("grid client is closed")]
    Closed,

    /// The call did not complete within its deadline.
    #[error("{0} timed out")]
    Timeout(&'static str),

    /// The member answered with an error.
    #[error("grid error: {0}")]
    Remote(String),

    /// The member answered with something we could not decode.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;
