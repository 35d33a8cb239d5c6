//! Remote grid client over the member's JSON REST protocol.
//!
//! # Protocol
//! ```text
//! GET /objects                 → [{"name", "serviceName"}]
//! GET /maps/{name}/{key}       → {"value"} | 404 when absent
//! PUT /maps/{name}/{key}       ← {"value"}  → {"previous"}
//! ```
//!
//! # Design Decisions
//! - `connect` probes `/objects` so an unreachable member fails startup
//! - Map handles are local proxies; the member creates maps on first write
//! - No retries here; a failed call surfaces to the caller as is

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::grid::client::{DistributedMap, GridClient};
use crate::grid::types::{GridError, GridResult, ObjectDescriptor, Value};

#[derive(Debug, Serialize, Deserialize)]
pub struct ValueBody {
    pub value: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PutReply {
    #[serde(default)]
    pub previous: Option<Value>,
}

struct Shared {
    name: String,
    base_url: Url,
    http: reqwest::Client,
    running: AtomicBool,
}

/// Client for a remote grid member.
#[derive(Clone)]
pub struct RemoteGrid {
    shared: Arc<Shared>,
}

impl RemoteGrid {
    /// Connect to the member at `address` (`host:port` or a full URL).
    pub async fn connect(address: &str, name: String, connect_timeout: Duration) -> GridResult<Self> {
        let base_url = parse_address(address)?;
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| GridError::Unreachable(e.to_string()))?;

        let client = Self {
            shared: Arc::new(Shared {
                name,
                base_url,
                http,
                running: AtomicBool::new(true),
            }),
        };

        let objects = tokio::time::timeout(connect_timeout, client.list_objects())
            .await
            .map_err(|_| GridError::Timeout("connect"))??;

        tracing::info!(
            address = %client.shared.base_url,
            client_name = %client.shared.name,
            objects = objects.len(),
            "Connected to grid member"
        );

        Ok(client)
    }

    fn ensure_running(&self) -> GridResult<()> {
        if self.shared.running.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(GridError::Closed)
        }
    }
}

fn parse_address(address: &str) -> GridResult<Url> {
    let raw = if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    };
    Url::parse(&raw).map_err(|e| GridError::Unreachable(format!("invalid address '{}': {}", address, e)))
}

fn endpoint(base: &Url, segments: &[&str]) -> GridResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| GridError::Protocol(format!("'{}' cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn transport_error(e: reqwest::Error) -> GridError {
    if e.is_connect() {
        GridError::Unreachable(e.to_string())
    } else if e.is_timeout() {
        GridError::Timeout("grid request")
    } else if e.is_decode() {
        GridError::Protocol(e.to_string())
    } else {
        GridError::Remote(e.to_string())
    }
}

async fn check_status(response: reqwest::Response) -> GridResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GridError::Remote(format!("member returned {}: {}", status, body)))
}

#[async_trait]
impl GridClient for RemoteGrid {
    fn name(&self) -> &str {
        &self.shared.name
    }

    fn running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    async fn list_objects(&self) -> GridResult<Vec<ObjectDescriptor>> {
        self.ensure_running()?;
        let url = endpoint(&self.shared.base_url, &["objects"])?;
        let response = self.shared.http.get(url).send().await.map_err(transport_error)?;
        check_status(response)
            .await?
            .json()
            .await
            .map_err(transport_error)
    }

    async fn get_map(&self, name: &str) -> GridResult<Arc<dyn DistributedMap>> {
        self.ensure_running()?;
        Ok(Arc::new(RemoteMap {
            name: name.to_string(),
            grid: self.clone(),
        }))
    }

    async fn close(&self) -> GridResult<()> {
        if self.shared.running.swap(false, Ordering::AcqRel) {
            tracing::info!(client_name = %self.shared.name, "Grid client shut down");
        }
        Ok(())
    }
}

/// Proxy for a map on the remote member.
pub struct RemoteMap {
    name: String,
    grid: RemoteGrid,
}

#[async_trait]
impl DistributedMap for RemoteMap {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> GridResult<Option<Value>> {
        self.grid.ensure_running()?;
        let url = endpoint(&self.grid.shared.base_url, &["maps", &self.name, key])?;
        let response = self
            .grid
            .shared
            .http
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: ValueBody = check_status(response)
            .await?
            .json()
            .await
            .map_err(transport_error)?;
        Ok(Some(body.value))
    }

    async fn put(&self, key: &str, value: Value) -> GridResult<Option<Value>> {
        self.grid.ensure_running()?;
        let url = endpoint(&self.grid.shared.base_url, &["maps", &self.name, key])?;
        let response = self
            .grid
            .shared
            .http
            .put(url)
            .json(&ValueBody { value })
            .send()
            .await
            .map_err(transport_error)?;

        let reply: PutReply = check_status(response)
            .await?
            .json()
            .await
            .map_err(transport_error)?;
        Ok(reply.previous)
    }
}
