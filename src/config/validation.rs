//! Configuration validation.
//!
//! Serde handles syntax; this checks value ranges and cross-field rules.
//! All problems are reported at once, not just the first.
//! `service.port = 0` is accepted and binds an ephemeral port.

use thiserror::Error;

use crate::config::schema::{AppConfig, BackendKind};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("service.name must not be empty")]
    EmptyServiceName,

    #[error("timeouts.{0} must be greater than 0")]
    ZeroTimeout(&'static str),

    #[error("backend.address is required for the remote backend")]
    MissingBackendAddress,

    #[error("backend.seed_map must not be empty")]
    EmptySeedMap,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.service.name.trim().is_empty() {
        errors.push(ValidationError::EmptyServiceName);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if config.timeouts.shutdown_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("shutdown_secs"));
    }
    if config.backend.kind == BackendKind::Remote && config.backend.address.trim().is_empty() {
        errors.push(ValidationError::MissingBackendAddress);
    }
    if config.backend.seed_map.is_empty() {
        errors.push(ValidationError::EmptySeedMap);
    }
    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
