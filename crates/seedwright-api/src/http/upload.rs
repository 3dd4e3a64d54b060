//! Sidecar (NFO) upload endpoint.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use tracing::info;

use crate::http::constants::{UPLOAD_FIELD, UPLOAD_MESSAGE};
use crate::http::errors::ApiError;
use crate::models::UploadResponse;
use crate::state::ApiState;

pub(crate) async fn upload_sidecar(
    State(state): State<Arc<ApiState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart =
        multipart.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(err.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let original_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiError::bad_request(err.body_text()))?;
        let stored = state
            .uploads
            .store(&original_name, &bytes)
            .await
            .map_err(|err| ApiError::from_fsops(&err, "upload target not found"))?;
        state.telemetry.inc_upload();
        info!(
            original = %original_name,
            stored = %stored.display(),
            bytes = bytes.len(),
            "sidecar uploaded"
        );
        return Ok(Json(UploadResponse {
            message: UPLOAD_MESSAGE.to_string(),
            path: stored.to_string_lossy().into_owned(),
        }));
    }

    Err(ApiError::bad_request("no file uploaded"))
}
