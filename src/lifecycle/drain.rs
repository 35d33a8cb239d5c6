//! Ordered, deadline-bounded shutdown.
//!
//! ```text
//! signal → Draining
//!     → close grid client      (deadline)
//!     → close HTTP listener    (same deadline)
//!     → Stopped
//! ```
//!
//! The grid goes first: with the listener closed first, requests arriving
//! meanwhile would fail against a closing grid instead of being refused.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::{timeout_at, Instant};

use crate::grid::{GridClient, GridError};
use crate::lifecycle::phase::{Lifecycle, Phase};

/// Something that can be stopped gracefully, consuming it.
#[async_trait]
pub trait GracefulClose: Send {
    async fn close(self) -> Result<(), std::io::Error>;
}

/// Errors that make the drain unsuccessful.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("grid client did not close within {0:?}")]
    BackendCloseTimeout(Duration),

    #[error("grid client failed to close: {0}")]
    BackendClose(#[source] GridError),

    #[error("HTTP listener did not close within {0:?}")]
    ListenerCloseTimeout(Duration),

    #[error("HTTP listener failed to close: {0}")]
    ListenerClose(#[source] std::io::Error),
}

/// Close `grid`, then `listener`, both under one deadline of `timeout`.
///
/// The listener is closed even when the grid close fails; the first error is returned.
pub async fn drain<L>(
    grid: &dyn GridClient,
    listener: L,
    timeout: Duration,
    lifecycle: &Lifecycle,
) -> Result<(), LifecycleError>
where
    L: GracefulClose,
{
    lifecycle.advance(Phase::Draining);
    let deadline = Instant::now() + timeout;
    tracing::info!(timeout = ?timeout, "Draining");

    let backend = match timeout_at(deadline, grid.close()).await {
        Ok(Ok(())) => {
            tracing::info!("Grid client closed");
            Ok(())
        }
        Ok(Err(e)) => Err(LifecycleError::BackendClose(e)),
        Err(_) => Err(LifecycleError::BackendCloseTimeout(timeout)),
    };
    if let Err(e) = &backend {
        tracing::error!(error = %e, "Grid client close failed");
    }

    let listener = match timeout_at(deadline, listener.close()).await {
        Ok(Ok(())) => {
            tracing::info!("HTTP listener closed");
            Ok(())
        }
        Ok(Err(e)) => Err(LifecycleError::ListenerClose(e)),
        Err(_) => Err(LifecycleError::ListenerCloseTimeout(timeout)),
    };
    if let Err(e) = &listener {
        tracing::error!(error = %e, "HTTP listener close failed");
    }

    lifecycle.advance(Phase::Stopped);
    backend.and(listener)
}
