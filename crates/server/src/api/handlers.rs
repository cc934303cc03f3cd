use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use titlerank_core::{SanitizedConfig, SourceError};

use crate::metrics::encode_metrics;
use crate::state::{AppState, SnapshotInfo};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error half of every fallible handler.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

/// 400 for requests rejected locally, 502 for upstream failures.
pub fn source_error(e: &SourceError) -> ApiError {
    let status = if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::BAD_GATEWAY
    };
    api_error(status, e.to_string())
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub upstream_configured: bool,
    pub snapshot: SnapshotInfo,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        upstream_configured: state.source().is_some(),
        snapshot: state.snapshot_info().await,
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
