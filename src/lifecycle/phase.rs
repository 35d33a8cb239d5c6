//! Process lifecycle phases.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle phase. Moves forward only.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Starting = 0,
    Serving = 1,
    Draining = 2,
    Stopped = 3,
}

impl From<u8> for Phase {
    fn from(val: u8) -> Self {
        match val {
            0 => Phase::Starting,
            1 => Phase::Serving,
            2 => Phase::Draining,
            _ => Phase::Stopped,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Starting => "starting",
            Phase::Serving => "serving",
            Phase::Draining => "draining",
            Phase::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Tracks the current [`Phase`].
#[derive(Debug)]
pub struct Lifecycle {
    phase: AtomicU8,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(Phase::Starting as u8),
        }
    }

    pub fn phase(&self) -> Phase {
        Phase::from(self.phase.load(Ordering::Acquire))
    }

    /// Move to `next`. Returns false (and changes nothing) when that would go backwards.
    pub fn advance(&self, next: Phase) -> bool {
        let result = self
            .phase
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (next as u8 > current).then_some(next as u8)
            });

        match result {
            Ok(previous) => {
                tracing::info!(from = %Phase::from(previous), to = %next, "Lifecycle phase changed");
                true
            }
            Err(_) => false,
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
