//! Service identity and availability.

pub mod settings;
pub mod state;

pub use settings::{ClientInfo, ConfigReport, ConfigStore, ServiceConfig};
pub use state::State;
