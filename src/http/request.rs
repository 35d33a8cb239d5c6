//! Request parsing and identification.
//!
//! # Responsibilities
//! - Extract `name` and `key` from the query string
//! - Check the POST content type
//! - Give every request an `x-request-id` and a tracing span carrying it
//!
//! # Design Decisions
//! - Parameters must appear exactly once with a non-empty value; anything
//!   else fails before the grid is touched
//! - Content type is compared byte for byte with `application/json`
//! - `/setConfig` never rejects: [`first_param`] keeps the first occurrence

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderMap, Request},
};
use tracing::Span;

use crate::http::response::ApiError;

pub const X_REQUEST_ID: &str = "x-request-id";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Target of a `/map` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapParams {
    pub name: String,
    pub key: String,
}

impl MapParams {
    /// Parse from a raw query string.
    pub fn from_query(query: Option<&str>) -> Result<Self, ApiError> {
        let query = query.unwrap_or_default();
        Ok(Self {
            name: single_param(query, "name")?,
            key: single_param(query, "key")?,
        })
    }
}

fn single_param(query: &str, param: &str) -> Result<String, ApiError> {
    let mut values = url::form_urlencoded::parse(query.as_bytes())
        .filter(|(k, _)| k == param)
        .map(|(_, v)| v.into_owned());

    let value = values
        .next()
        .ok_or_else(|| ApiError::validation(format!("missing query parameter '{}'", param)))?;
    if values.next().is_some() {
        return Err(ApiError::validation(format!(
            "query parameter '{}' must be given exactly once",
            param
        )));
    }
    if value.is_empty() {
        return Err(ApiError::validation(format!(
            "query parameter '{}' must not be empty",
            param
        )));
    }
    Ok(value)
}

/// First value of `param`, if any. Later repeats are ignored.
pub fn first_param(query: Option<&str>, param: &str) -> Option<String> {
    url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .find(|(k, _)| k == param)
        .map(|(_, v)| v.into_owned())
}

/// Require `Content-Type: application/json`, exactly.
pub fn require_json(headers: &HeaderMap) -> Result<(), ApiError> {
    match headers.get(CONTENT_TYPE) {
        Some(value) if value.as_bytes() == JSON_CONTENT_TYPE.as_bytes() => Ok(()),
        Some(value) => Err(ApiError::validation(format!(
            "content type must be {}, got {}",
            JSON_CONTENT_TYPE,
            String::from_utf8_lossy(value.as_bytes())
        ))),
        None => Err(ApiError::validation(format!(
            "content type must be {}",
            JSON_CONTENT_TYPE
        ))),
    }
}

/// Span for one request, tagged with its request ID.
pub fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
    )
}
