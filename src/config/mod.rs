//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, environment overrides)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → seeds the mutable ServiceConfig owned by service::ConfigStore
//! ```
//!
//! # Design Decisions
//! - Startup config is immutable; only name and state change at runtime
//! - All fields have defaults to allow running with no file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve, ConfigError};
pub use schema::{AppConfig, BackendConfig, BackendKind, ObservabilityConfig, ServiceSection, TimeoutConfig};
pub use validation::ValidationError;
