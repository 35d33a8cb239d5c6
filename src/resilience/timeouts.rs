//! Timeout enforcement for grid calls.
//!
//! # Responsibilities
//! - Wrap every grid call in a deadline
//! - Turn an elapsed deadline into `GridError::Timeout` naming the call
//! - Record call outcome and latency
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; elapsed calls are dropped, which cancels them
//! - One deadline per request, shared by all calls of that request

use std::future::Future;
use std::time::Instant;

use tokio::time::{timeout_at, Instant as Deadline};

use crate::grid::{GridError, GridResult};
use crate::observability::metrics;

/// Run `call` under `deadline`. `op` names the call in errors and metrics.
pub async fn bounded<T, F>(op: &'static str, deadline: Deadline, call: F) -> GridResult<T>
where
    F: Future<Output = GridResult<T>>,
{
    let start = Instant::now();
    let result = match timeout_at(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(GridError::Timeout(op)),
    };

    let outcome = match &result {
        Ok(_) => "ok",
        Err(GridError::Timeout(_)) => "timeout",
        Err(_) => "error",
    };
    metrics::record_backend_call(op, outcome, start);

    result
}
