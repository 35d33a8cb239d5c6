//! Runtime service configuration.
//!
//! # Responsibilities
//! - Hold the mutable `ServiceConfig` shared by all request tasks
//! - Merge it with grid client metadata for `/config`
//!
//! # Design Decisions
//! - Whole-value atomic replace (arc-swap); readers never see a half update
//! - Last writer wins; no version token

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use serde::Serialize;

use crate::config::AppConfig;
use crate::grid::GridClient;
use crate::service::state::State;

/// Mutable configuration reported by `/config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    pub service_name: String,
    pub state: State,
    pub port: u16,
    /// Shutdown deadline in seconds.
    pub timeout: u64,
}

impl ServiceConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            service_name: config.service.name.clone(),
            state: State::default(),
            port: config.service.port,
            timeout: config.timeouts.shutdown_secs,
        }
    }
}

/// Point-in-time view of the grid client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub client_name: String,
    pub client_running: bool,
}

impl ClientInfo {
    /// Reads local client state only; never calls the grid.
    pub fn of(client: &dyn GridClient) -> Self {
        Self {
            client_name: client.name().to_string(),
            client_running: client.running(),
        }
    }
}

/// Body of `/config`: one flat JSON object.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigReport {
    #[serde(flatten)]
    pub config: ServiceConfig,
    #[serde(flatten)]
    pub client: ClientInfo,
}

/// Owner of the process-wide `ServiceConfig`.
pub struct ConfigStore {
    current: ArcSwap<ServiceConfig>,
}

impl ConfigStore {
    pub fn new(initial: ServiceConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }

    /// Consistent copy of the current configuration.
    pub fn snapshot(&self) -> Arc<ServiceConfig> {
        self.current.load_full()
    }

    /// Replace the selected fields. Returns the configuration before the update.
    pub fn update(&self, service_name: Option<String>, state: Option<State>) -> Arc<ServiceConfig> {
        self.current.rcu(|current| {
            let mut next = ServiceConfig::clone(current);
            if let Some(name) = &service_name {
                next.service_name = name.clone();
            }
            if let Some(state) = state {
                next.state = state;
            }
            next
        })
    }

    /// Swap in a new state, returning the old one.
    pub fn set_state(&self, state: State) -> State {
        self.update(None, Some(state)).state
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.current.load().timeout)
    }

    pub fn report(&self, client: &dyn GridClient) -> ConfigReport {
        ConfigReport {
            config: ServiceConfig::clone(&self.snapshot()),
            client: ClientInfo::of(client),
        }
    }
}
