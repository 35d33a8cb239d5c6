//! Configuration and probe handlers.

use axum::{
    extract::{RawQuery, State},
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};
use crate::http::request::first_param;
use crate::http::server::AppState;
use crate::service::{ConfigReport, State as ServiceState};

pub const CONFIG_PATH: &str = "/config";

/// `GET /health`
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// `GET /readiness`
pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// `GET /config`: service config merged with grid client info.
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigReport> {
    Json(state.settings.report(state.grid.as_ref()))
}

/// `GET|POST /setConfig?serviceName=&state=`, then redirect to `/config`.
///
/// Empty or absent parameters leave the field unchanged; a repeated
/// parameter takes its first value.
pub async fn set_config(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    let query = query.as_deref();
    let service_name = first_param(query, "serviceName").filter(|s| !s.is_empty());
    let new_state = first_param(query, "state")
        .filter(|s| !s.is_empty())
        .map(|s| ServiceState::from(s.as_str()));

    if service_name.is_some() || new_state.is_some() {
        let previous = state.settings.update(service_name, new_state);
        let current = state.settings.snapshot();
        tracing::info!(
            service_name = %current.service_name,
            state = %current.state,
            previous_state = %previous.state,
            "Service config updated"
        );
    }

    (StatusCode::FOUND, [(LOCATION, CONFIG_PATH)])
}
