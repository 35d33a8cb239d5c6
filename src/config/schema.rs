//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Service identity and listener settings.
    pub service: ServiceSection,

    /// Grid backend connection settings.
    pub backend: BackendConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Socket address the HTTP listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.host, self.service.port)
    }
}

/// Service identity and listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceSection {
    /// Name reported by `/config` until changed through `/setConfig`.
    pub name: String,

    /// Host part of the bind address.
    pub host: String,

    /// Listener port.
    pub port: u16,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            name: "sample-application".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Which grid client implementation to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Embedded in-process grid.
    #[default]
    Memory,
    /// Remote grid member reached over HTTP.
    Remote,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "remote" => Ok(BackendKind::Remote),
            other => Err(format!("unknown backend kind '{}'", other)),
        }
    }
}

/// Grid backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend implementation.
    pub kind: BackendKind,

    /// Member address (e.g., "localhost:5701"). Used by the remote backend.
    pub address: String,

    /// Client name reported in `/config`.
    pub client_name: String,

    /// Map seeded at startup so `/map` has known content.
    pub seed_map: String,

    /// Connection probe timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Memory,
            address: "localhost:5701".to_string(),
            client_name: "hz-go-service-client".to_string(),
            seed_map: "queryMap".to_string(),
            connect_timeout_secs: 5,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Budget for the backend calls of a single request.
    pub request_secs: u64,

    /// Shutdown deadline, also reported as `timeout` by `/config`.
    pub shutdown_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 3,
            shutdown_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log level when `RUST_LOG` is unset.
    pub log_level: String,

    /// Emit JSON log lines instead of the human readable format.
    pub json_logs: bool,

    /// Expose a Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Address of the Prometheus scrape endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
