//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect the grid client (fatal if unreachable, no degraded mode)
//! - Seed the known map so `/map` has content from the start
//! - Build the service config and bind the listener
//! - Hand back a [`Running`] gateway that can be drained
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, no retry loop
//! - Listener binds last (traffic only when ready)

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::grid::{self, GridClient, GridError};
use crate::http::{AppState, HttpServer, ServerHandle};
use crate::lifecycle::drain::{drain, LifecycleError};
use crate::lifecycle::phase::{Lifecycle, Phase};
use crate::lifecycle::signals::shutdown_signal;
use crate::resilience::bounded;
use crate::service::{ConfigStore, ServiceConfig};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot connect to grid: {0}")]
    Backend(#[source] GridError),

    #[error("cannot seed map '{map}': {source}")]
    Seed {
        map: String,
        #[source]
        source: GridError,
    },

    #[error("cannot bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Any error that ends the process unsuccessfully.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// A started gateway in the `Serving` phase.
pub struct Running {
    pub grid: Arc<dyn GridClient>,
    pub settings: Arc<ConfigStore>,
    pub lifecycle: Arc<Lifecycle>,
    pub local_addr: SocketAddr,
    server: ServerHandle,
}

impl Running {
    /// Drain: grid first, then the listener, under the configured timeout.
    pub async fn shutdown(self) -> Result<(), LifecycleError> {
        let timeout = self.settings.shutdown_timeout();
        drain(self.grid.as_ref(), self.server, timeout, &self.lifecycle).await
    }
}

/// Start everything `config` describes.
pub async fn bootstrap(config: &AppConfig) -> Result<Running, StartupError> {
    let grid = grid::connect(&config.backend)
        .await
        .map_err(StartupError::Backend)?;
    bootstrap_with(config, grid).await
}

/// Start on an already connected grid client.
pub async fn bootstrap_with(
    config: &AppConfig,
    grid: Arc<dyn GridClient>,
) -> Result<Running, StartupError> {
    let lifecycle = Arc::new(Lifecycle::new());
    let request_timeout = Duration::from_secs(config.timeouts.request_secs);

    seed_map(grid.as_ref(), &config.backend.seed_map, &config.service.name, request_timeout).await?;

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;
    let local_addr = listener.local_addr().map_err(|source| StartupError::Bind {
        address: address.clone(),
        source,
    })?;

    // Report the port actually bound (differs from config when it asked for 0).
    let mut service_config = ServiceConfig::from_app_config(config);
    service_config.port = local_addr.port();
    let settings = Arc::new(ConfigStore::new(service_config));

    let state = AppState {
        grid: grid.clone(),
        settings: settings.clone(),
        request_timeout,
    };
    let server = HttpServer::new(state).spawn(listener);

    tracing::info!(
        address = %local_addr,
        service_name = %config.service.name,
        client_name = %grid.name(),
        "Gateway serving"
    );
    lifecycle.advance(Phase::Serving);

    Ok(Running {
        grid,
        settings,
        lifecycle,
        local_addr,
        server,
    })
}

async fn seed_map(
    grid: &dyn GridClient,
    map_name: &str,
    service_name: &str,
    timeout: Duration,
) -> Result<(), StartupError> {
    let deadline = tokio::time::Instant::now() + timeout;
    let seed_error = |source: GridError| StartupError::Seed {
        map: map_name.to_string(),
        source,
    };

    let map = bounded("get_map", deadline, grid.get_map(map_name))
        .await
        .map_err(seed_error)?;
    bounded("put", deadline, map.put("serviceName", json!(service_name)))
        .await
        .map_err(seed_error)?;

    tracing::info!(map = %map_name, "Seeded map");
    Ok(())
}

/// Full process life: start, serve until a termination signal, drain.
pub async fn run(config: AppConfig) -> Result<(), GatewayError> {
    let grid = grid::connect(&config.backend)
        .await
        .map_err(StartupError::Backend)?;
    run_until(&config, grid, shutdown_signal()).await
}

/// Serve on `grid` until `signal` resolves, then drain.
pub async fn run_until<S>(
    config: &AppConfig,
    grid: Arc<dyn GridClient>,
    signal: S,
) -> Result<(), GatewayError>
where
    S: Future<Output = ()>,
{
    let running = bootstrap_with(config, grid).await?;
    signal.await;
    tracing::info!("Shutdown requested, draining");
    running.shutdown().await?;
    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendKind;

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.service.host = "127.0.0.1".into();
        config.service.port = 0;
        config.timeouts.shutdown_secs = 2;
        config
    }

    #[tokio::test]
    async fn test_bootstrap_seeds_map_and_serves() {
        let running = bootstrap(&test_config()).await.unwrap();
        assert_eq!(running.lifecycle.phase(), Phase::Serving);
        assert_ne!(running.local_addr.port(), 0);
        assert_eq!(running.settings.snapshot().port, running.local_addr.port());

        let objects = running.grid.list_objects().await.unwrap();
        assert!(objects.iter().any(|o| o.is_map_named("queryMap")));
        let seeded = running
            .grid
            .get_map("queryMap")
            .await
            .unwrap()
            .get("serviceName")
            .await
            .unwrap();
        assert_eq!(seeded, Some(json!("sample-application")));

        let lifecycle = running.lifecycle.clone();
        let grid = running.grid.clone();
        running.shutdown().await.unwrap();
        assert_eq!(lifecycle.phase(), Phase::Stopped);
        assert!(!grid.running());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_fatal() {
        let unused = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = unused.local_addr().unwrap();
        drop(unused);

        let mut config = test_config();
        config.backend.kind = BackendKind::Remote;
        config.backend.address = addr.to_string();
        config.backend.connect_timeout_secs = 1;

        let err = bootstrap(&config).await.err().unwrap();
        assert!(matches!(err, StartupError::Backend(_)));
    }
}
