//! Response shaping.
//!
//! # Responsibilities
//! - JSON bodies for entries and informational messages
//! - Map handler errors to status codes
//!
//! # Design Decisions
//! - Absent map or key is a normal outcome: 200 with a message, not an error
//! - Validation problems → 400, logged at debug
//! - Grid failures → 500 naming the failing operation, logged at error

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{GridError, Value};

pub const NO_MAP: &str = "no map for given name";
pub const NO_VALUE: &str = "no value for given key";

/// Informational or error body: `{"msg": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub msg: String,
}

impl Message {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// A found entry: `{"key": ..., "value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    pub value: Value,
}

/// Grid operations a request can fail in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListObjects,
    GetMap,
    GetValue,
    PutValue,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ListObjects => "list_objects",
            Operation::GetMap => "get_map",
            Operation::GetValue => "get",
            Operation::PutValue => "put",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Operation::ListObjects => "failed to list distributed objects",
            Operation::GetMap => "failed to retrieve map",
            Operation::GetValue => "failed to retrieve value",
            Operation::PutValue => "failed to put value",
        }
    }
}

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{}: {source}", .op.describe())]
    Backend {
        op: Operation,
        #[source]
        source: GridError,
    },
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn backend(op: Operation) -> impl FnOnce(GridError) -> Self {
        move |source| ApiError::Backend { op, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Backend { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Validation(msg) => tracing::debug!(reason = %msg, "Rejected request"),
            ApiError::Backend { op, source } => {
                tracing::error!(op = op.as_str(), error = %source, "Grid call failed")
            }
        }
        (self.status(), Json(Message::new(self.to_string()))).into_response()
    }
}
