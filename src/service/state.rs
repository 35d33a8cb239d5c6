//! Service availability state.

use std::fmt;

use serde::Serialize;

/// Availability reported by the service. Exactly one value at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum State {
    Unknown,
    NotAvailable,
    #[default]
    Available,
}

impl State {
    pub const ALL: [State; 3] = [State::Unknown, State::NotAvailable, State::Available];

    pub fn as_str(&self) -> &'static str {
        match self {
            State::Unknown => "Unknown",
            State::NotAvailable => "NotAvailable",
            State::Available => "Available",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything unrecognized maps to `Unknown`; an update never gets rejected.
impl From<&str> for State {
    fn from(s: &str) -> Self {
        match s {
            "NotAvailable" => State::NotAvailable,
            "Available" => State::Available,
            _ => State::Unknown,
        }
    }
}
