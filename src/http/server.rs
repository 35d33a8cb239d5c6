//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, metrics, timeout)
//! - Bind server to listener and stop it on the shutdown signal

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{MatchedPath, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::grid::GridClient;
use crate::http::config::{get_config, health, readiness, set_config};
use crate::http::entry::{get_entry, put_entry};
use crate::http::request::request_span;
use crate::lifecycle::{GracefulClose, Shutdown, ShutdownSignal};
use crate::observability::metrics;
use crate::service::ConfigStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub grid: Arc<dyn GridClient>,
    pub settings: Arc<ConfigStore>,
    /// Budget for the grid calls of one request.
    pub request_timeout: Duration,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around `state`.
    pub fn new(state: AppState) -> Self {
        let outer_timeout = state.settings.shutdown_timeout().max(state.request_timeout);
        let router = Self::build_router(state, outer_timeout);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState, outer_timeout: Duration) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/readiness", get(readiness))
            .route("/config", get(get_config))
            .route("/setConfig", get(set_config).post(set_config))
            .route("/map", get(get_entry).post(put_entry))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(request_span))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(middleware::from_fn(track_metrics))
                    .layer(TimeoutLayer::new(outer_timeout)),
            )
    }

    /// The configured router, e.g. for driving it without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires, then finish in-flight requests.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run in a background task and return a handle that can stop it.
    pub fn spawn(self, listener: TcpListener) -> ServerHandle {
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        let task = tokio::spawn(self.run(listener, signal));
        ServerHandle { shutdown, task }
    }
}

/// Handle to a spawned [`HttpServer`].
pub struct ServerHandle {
    shutdown: Shutdown,
    task: JoinHandle<Result<(), std::io::Error>>,
}

#[async_trait]
impl GracefulClose for ServerHandle {
    async fn close(self) -> Result<(), std::io::Error> {
        self.shutdown.trigger();
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::other(e)),
        }
    }
}

async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(&method, &route, response.status().as_u16(), start);
    response
}
