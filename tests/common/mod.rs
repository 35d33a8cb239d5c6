//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use grid_gateway::config::AppConfig;
use grid_gateway::grid::{
    DistributedMap, GridClient, GridError, GridResult, MemoryGrid, ObjectDescriptor, Value,
};
use grid_gateway::http::{AppState, HttpServer, ServerHandle};
use grid_gateway::service::{ConfigStore, ServiceConfig};
use tokio::net::TcpListener;

/// Grid double that counts calls and can be told to fail or stall.
#[derive(Default)]
pub struct Faults {
    pub fail_list: AtomicBool,
    pub fail_get_map: AtomicBool,
    pub fail_get: AtomicBool,
    pub fail_put: AtomicBool,
    pub stall_get: AtomicBool,
    pub stall_close: AtomicBool,
}

pub struct CountingGrid {
    inner: MemoryGrid,
    pub calls: Arc<AtomicUsize>,
    pub faults: Arc<Faults>,
}

impl CountingGrid {
    pub fn new() -> Self {
        Self {
            inner: MemoryGrid::new("hz-go-service-client"),
            calls: Arc::new(AtomicUsize::new(0)),
            faults: Arc::new(Faults::default()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn injected(flag: &AtomicBool, what: &str) -> GridResult<()> {
    if flag.load(Ordering::SeqCst) {
        Err(GridError::Remote(format!("injected {} failure", what)))
    } else {
        Ok(())
    }
}

#[async_trait]
impl GridClient for CountingGrid {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn running(&self) -> bool {
        self.inner.running()
    }

    async fn list_objects(&self) -> GridResult<Vec<ObjectDescriptor>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        injected(&self.faults.fail_list, "list_objects")?;
        self.inner.list_objects().await
    }

    async fn get_map(&self, name: &str) -> GridResult<Arc<dyn DistributedMap>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        injected(&self.faults.fail_get_map, "get_map")?;
        let map = self.inner.get_map(name).await?;
        Ok(Arc::new(CountingMap {
            inner: map,
            calls: self.calls.clone(),
            faults: self.faults.clone(),
        }))
    }

    async fn close(&self) -> GridResult<()> {
        if self.faults.stall_close.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        self.inner.close().await
    }
}

struct CountingMap {
    inner: Arc<dyn DistributedMap>,
    calls: Arc<AtomicUsize>,
    faults: Arc<Faults>,
}

#[async_trait]
impl DistributedMap for CountingMap {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn get(&self, key: &str) -> GridResult<Option<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        injected(&self.faults.fail_get, "get")?;
        if self.faults.stall_get.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Value) -> GridResult<Option<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        injected(&self.faults.fail_put, "put")?;
        self.inner.put(key, value).await
    }
}

pub struct TestApp {
    pub base_url: String,
    pub grid: Arc<CountingGrid>,
    pub settings: Arc<ConfigStore>,
    pub server: ServerHandle,
}

/// Start the gateway router on an ephemeral port backed by a [`CountingGrid`].
pub async fn start_app(request_timeout: Duration) -> TestApp {
    let grid = Arc::new(CountingGrid::new());
    let settings = Arc::new(ConfigStore::new(ServiceConfig::from_app_config(
        &AppConfig::default(),
    )));

    let state = AppState {
        grid: grid.clone(),
        settings: settings.clone(),
        request_timeout,
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(state).spawn(listener);

    TestApp {
        base_url: format!("http://{}", addr),
        grid,
        settings,
        server,
    }
}

/// HTTP client that does not follow redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
