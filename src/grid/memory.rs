//! Embedded in-process grid.
//!
//! Hosts maps inside the gateway process. Used for local runs and as the
//! backend in tests. Maps are created on first access, like on a real member.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::grid::client::{DistributedMap, GridClient};
use crate::grid::types::{GridError, GridResult, ObjectDescriptor, Value};

/// In-process grid client.
#[derive(Clone)]
pub struct MemoryGrid {
    name: String,
    maps: Arc<DashMap<String, Arc<MemoryMap>>>,
    running: Arc<AtomicBool>,
}

impl MemoryGrid {
    /// Create a running grid with no maps.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            maps: Arc::new(DashMap::new()),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    fn ensure_running(&self) -> GridResult<()> {
        if self.running.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(GridError::Closed)
        }
    }
}

#[async_trait]
impl GridClient for MemoryGrid {
    fn name(&self) -> &str {
        &self.name
    }

    fn running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    async fn list_objects(&self) -> GridResult<Vec<ObjectDescriptor>> {
        self.ensure_running()?;
        Ok(self
            .maps
            .iter()
            .map(|entry| ObjectDescriptor::map(entry.key().clone()))
            .collect())
    }

    async fn get_map(&self, name: &str) -> GridResult<Arc<dyn DistributedMap>> {
        self.ensure_running()?;
        let map = self
            .maps
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(map = %name, "Creating map");
                Arc::new(MemoryMap {
                    name: name.to_string(),
                    entries: DashMap::new(),
                    running: self.running.clone(),
                })
            })
            .clone();
        Ok(map)
    }

    async fn close(&self) -> GridResult<()> {
        if self.running.swap(false, Ordering::AcqRel) {
            tracing::info!(client_name = %self.name, "Embedded grid shut down");
        }
        Ok(())
    }
}

/// A map hosted by [`MemoryGrid`].
pub struct MemoryMap {
    name: String,
    entries: DashMap<String, Value>,
    running: Arc<AtomicBool>,
}

#[async_trait]
impl DistributedMap for MemoryMap {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> GridResult<Option<Value>> {
        if !self.running.load(Ordering::Acquire) {
            return Err(GridError::Closed);
        }
        Ok(self.entries.get(key).map(|r| r.value().clone()))
    }

    async fn put(&self, key: &str, value: Value) -> GridResult<Option<Value>> {
        if !self.running.load(Ordering::Acquire) {
            return Err(GridError::Closed);
        }
        Ok(self.entries.insert(key.to_string(), value))
    }
}
