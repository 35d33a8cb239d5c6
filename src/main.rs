//! Grid gateway
//!
//! HTTP front end for named key-value maps hosted by a data grid.
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────┐
//!     ──────────────────────┼─▶ http::server ─▶ http::entry ──────────┼──▶ Grid member
//!                           │        │              │ (deadline)       │    (maps)
//!                           │        ▼              ▼                  │
//!                           │   http::config    resilience             │
//!                           │        │                                 │
//!                           │        ▼                                 │
//!                           │  service::ConfigStore                    │
//!                           │                                          │
//!                           │  lifecycle: start → serve → drain        │
//!                           └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use grid_gateway::config;
use grid_gateway::lifecycle;
use grid_gateway::observability;

#[derive(Parser)]
#[command(name = "grid-gateway")]
#[command(about = "HTTP gateway for data grid maps", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "GRID_GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match config::resolve(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("grid-gateway: {}", e);
            return ExitCode::FAILURE;
        }
    };

    observability::logging::init_logging(&config.observability);
    tracing::info!("grid-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.bind_address(),
        backend = ?config.backend.kind,
        request_timeout_secs = config.timeouts.request_secs,
        shutdown_timeout_secs = config.timeouts.shutdown_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        }
    }

    match lifecycle::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Gateway stopped with error");
            ExitCode::FAILURE
        }
    }
}
