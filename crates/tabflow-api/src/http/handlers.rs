//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tabflow_protocols::provider::CREDENTIAL_HEADER;
use tabflow_protocols::types::Tab;

use crate::error::ApiError;
use crate::pipeline::{categorize_stream, CredentialPlan};
use crate::state::AppState;

pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Body of `POST /api/categorize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizeRequest {
    pub tabs: Vec<Tab>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub requests: u64,
}

/// Stream a categorization of the posted tabs.
///
/// Failures before streaming starts are returned as a non-2xx `{error}`
/// response; failures afterwards arrive as the terminal frame.
pub async fn categorize(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    state.increment_requests();

    let request: CategorizeRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let caller = headers
        .get(CREDENTIAL_HEADER)
        .and_then(|value| value.to_str().ok());
    let plan = CredentialPlan::resolve(caller, &state.api_keys);
    if plan.is_empty() {
        return Err(ApiError::NoCredentials);
    }

    info!(
        "Categorize request: {} tab(s), plan {:?}",
        request.tabs.len(),
        plan
    );

    let frames = categorize_stream(state.categorizer.clone(), plan, request.tabs).map(|frame| {
        debug!("Sending {} frame", frame.status());
        frame.to_ndjson_line()
    });

    Ok((
        [(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)],
        Body::from_stream(frames),
    )
        .into_response())
}

/// Any method other than POST on the categorize route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Liveness check.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.uptime().as_secs(),
        requests: state.request_count(),
    })
}
