//! `/map` handlers: read and write one entry of a named map.
//!
//! # Data Flow
//! ```text
//! GET  /map?name=&key=
//!     → params (400 on failure, grid untouched)
//!     → list_objects → no such map?  200 {"msg": "no map for given name"}
//!     → get_map → get → absent/empty? 200 {"msg": "no value for given key"}
//!                     → present      200 {"key", "value"}
//!
//! POST /map?name=&key=   {"value": ...}
//!     → params, content type, body (400 on failure)
//!     → get_map → put                201 {"msg": ...}
//! ```
//!
//! All grid calls of one request share a deadline of `request_timeout`.
//! Dropping the handler (client gone) cancels the in-flight call.

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tokio::time::Instant;

use crate::grid::Value;
use crate::http::request::{require_json, MapParams};
use crate::http::response::{ApiError, Entry, Message, Operation, NO_MAP, NO_VALUE};
use crate::http::server::AppState;
use crate::resilience::bounded;

#[derive(Debug, Deserialize)]
struct PutBody {
    value: Value,
}

/// `GET /map`
pub async fn get_entry(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let params = MapParams::from_query(query.as_deref())?;
    let deadline = Instant::now() + state.request_timeout;

    tracing::debug!(map = %params.name, key = %params.key, "Reading entry");

    // The object set can change between requests, so this is checked every time.
    let objects = bounded(
        Operation::ListObjects.as_str(),
        deadline,
        state.grid.list_objects(),
    )
    .await
    .map_err(ApiError::backend(Operation::ListObjects))?;

    if !objects.iter().any(|o| o.is_map_named(&params.name)) {
        return Ok(Json(Message::new(NO_MAP)).into_response());
    }

    let map = bounded(
        Operation::GetMap.as_str(),
        deadline,
        state.grid.get_map(&params.name),
    )
    .await
    .map_err(ApiError::backend(Operation::GetMap))?;

    let value = bounded(Operation::GetValue.as_str(), deadline, map.get(&params.key))
        .await
        .map_err(ApiError::backend(Operation::GetValue))?;

    match value {
        Some(value) if !is_empty_value(&value) => Ok(Json(Entry {
            key: params.key,
            value,
        })
        .into_response()),
        _ => Ok(Json(Message::new(NO_VALUE)).into_response()),
    }
}

/// `null` and `""` read back as "no value".
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// `POST /map`
///
/// No existence check: writing is what brings a map into existence.
pub async fn put_entry(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let params = MapParams::from_query(query.as_deref())?;
    require_json(&headers)?;
    let PutBody { value } = serde_json::from_slice(&body)
        .map_err(|e| ApiError::validation(format!("invalid body: {}", e)))?;

    let deadline = Instant::now() + state.request_timeout;

    let map = bounded(
        Operation::GetMap.as_str(),
        deadline,
        state.grid.get_map(&params.name),
    )
    .await
    .map_err(ApiError::backend(Operation::GetMap))?;

    let echoed = value.to_string();
    let previous = bounded(
        Operation::PutValue.as_str(),
        deadline,
        map.put(&params.key, value),
    )
    .await
    .map_err(ApiError::backend(Operation::PutValue))?;

    tracing::info!(
        map = %params.name,
        key = %params.key,
        replaced = previous.is_some(),
        "Entry written"
    );

    let msg = format!(
        "(key: {}, value: {}) has been put into map {}",
        params.key, echoed, params.name
    );
    Ok((StatusCode::CREATED, Json(Message::new(msg))).into_response())
}
