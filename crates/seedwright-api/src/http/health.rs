//! Health and metrics endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use seedwright_telemetry::{MetricsSnapshot, build_sha};
use serde::Serialize;
use tracing::error;

use crate::http::constants::CONTENT_TYPE_METRICS;
use crate::http::errors::ApiError;
use crate::state::ApiState;

/// Liveness document; `status` is always `ok` while the process serves requests.
#[derive(Serialize)]
pub(crate) struct HealthDocument {
    pub(crate) status: &'static str,
    pub(crate) build: &'static str,
    pub(crate) metrics: MetricsSnapshot,
}

pub(crate) async fn health(State(state): State<Arc<ApiState>>) -> Json<HealthDocument> {
    Json(HealthDocument {
        status: "ok",
        build: build_sha(),
        metrics: state.telemetry.snapshot(),
    })
}

/// Prometheus scrape endpoint.
pub(crate) async fn metrics(State(state): State<Arc<ApiState>>) -> Result<Response, ApiError> {
    let exposition = state.telemetry.render().map_err(|err| {
        error!(error = %err, "metrics exposition failed");
        ApiError::internal("failed to render metrics")
    })?;
    Ok(([(CONTENT_TYPE, CONTENT_TYPE_METRICS)], exposition).into_response())
}
