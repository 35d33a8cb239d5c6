//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables that override file values.
pub const ENV_SERVICE_NAME: &str = "GRID_GATEWAY_SERVICE_NAME";
pub const ENV_PORT: &str = "GRID_GATEWAY_PORT";
pub const ENV_TIMEOUT: &str = "GRID_GATEWAY_TIMEOUT";
pub const ENV_BACKEND_ADDRESS: &str = "GRID_GATEWAY_BACKEND_ADDRESS";
pub const ENV_BACKEND_KIND: &str = "GRID_GATEWAY_BACKEND_KIND";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build the effective configuration: file (or defaults), then environment, then validation.
pub fn resolve(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    apply_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply overrides from `lookup`. Unset variables leave the value untouched.
pub fn apply_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(name) = lookup(ENV_SERVICE_NAME) {
        config.service.name = name;
    }
    if let Some(port) = lookup(ENV_PORT) {
        config.service.port = port.parse().map_err(|e: std::num::ParseIntError| ConfigError::Env {
            var: ENV_PORT,
            reason: e.to_string(),
        })?;
    }
    if let Some(timeout) = lookup(ENV_TIMEOUT) {
        config.timeouts.shutdown_secs =
            timeout.parse().map_err(|e: std::num::ParseIntError| ConfigError::Env {
                var: ENV_TIMEOUT,
                reason: e.to_string(),
            })?;
    }
    if let Some(address) = lookup(ENV_BACKEND_ADDRESS) {
        config.backend.address = address;
    }
    if let Some(kind) = lookup(ENV_BACKEND_KIND) {
        config.backend.kind = kind.parse().map_err(|reason| ConfigError::Env {
            var: ENV_BACKEND_KIND,
            reason,
        })?;
    }

    Ok(())
}
