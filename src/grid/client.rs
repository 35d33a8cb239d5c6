//! Grid client capability.
//!
//! # Responsibilities
//! - Describe what the gateway needs from the data grid
//! - Pick the configured implementation at startup
//!
//! # Design Decisions
//! - Implementations must be safe for concurrent use; one handle is shared
//!   by every request task
//! - Calls carry no deadline of their own; callers bound them
//!   (see `resilience::timeouts`), and dropping a call cancels it

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{BackendConfig, BackendKind};
use crate::grid::memory::MemoryGrid;
use crate::grid::remote::RemoteGrid;
use crate::grid::types::{GridResult, ObjectDescriptor, Value};

/// A connected grid client.
#[async_trait]
pub trait GridClient: Send + Sync {
    /// Client name as configured.
    fn name(&self) -> &str;

    /// Whether the client is still usable. Reads local state only.
    fn running(&self) -> bool;

    /// List every object currently hosted by the grid.
    async fn list_objects(&self) -> GridResult<Vec<ObjectDescriptor>>;

    /// Get a handle to the named map. The grid creates it lazily.
    async fn get_map(&self, name: &str) -> GridResult<Arc<dyn DistributedMap>>;

    /// Shut the client down. Later calls fail with `GridError::Closed`.
    async fn close(&self) -> GridResult<()>;
}

/// Handle to one distributed map.
#[async_trait]
pub trait DistributedMap: Send + Sync {
    fn name(&self) -> &str;

    /// Value stored under `key`, if any.
    async fn get(&self, key: &str) -> GridResult<Option<Value>>;

    /// Store `value` under `key`, returning the previous value.
    async fn put(&self, key: &str, value: Value) -> GridResult<Option<Value>>;
}

/// Start the client selected by `config`.
pub async fn connect(config: &BackendConfig) -> GridResult<Arc<dyn GridClient>> {
    match config.kind {
        BackendKind::Memory => {
            tracing::info!(client_name = %config.client_name, "Starting embedded grid");
            Ok(Arc::new(MemoryGrid::new(config.client_name.clone())))
        }
        BackendKind::Remote => {
            let client = RemoteGrid::connect(
                &config.address,
                config.client_name.clone(),
                Duration::from_secs(config.connect_timeout_secs),
            )
            .await?;
            Ok(Arc::new(client))
        }
    }
}
