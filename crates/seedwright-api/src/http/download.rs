//! Artifact download endpoint.

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::Response,
};
use seedwright_fsops::FsOpsError;
use seedwright_jobs::TORRENT_EXTENSION;
use serde::Deserialize;
use tracing::{error, info};

use crate::http::constants::{CONTENT_TYPE_OCTET_STREAM, CONTENT_TYPE_TORRENT};
use crate::http::errors::ApiError;
use crate::state::ApiState;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DownloadQuery {
    pub(crate) file: Option<String>,
}

pub(crate) async fn download_artifact(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let Some(requested) = query.file.filter(|file| !file.is_empty()) else {
        state.telemetry.inc_download("rejected");
        return Err(ApiError::bad_request("missing file parameter"));
    };

    let path = state
        .downloads
        .resolve_download(&requested)
        .await
        .map_err(|err| {
            state.telemetry.inc_download(download_label(&err));
            ApiError::from_fsops(&err, "file not found")
        })?;
    info!(requested = %requested, resolved = %path.display(), "download requested");

    let bytes = tokio::fs::read(&path).await.map_err(|err| {
        state.telemetry.inc_download("failed");
        error!(error = %err, path = %path.display(), "failed to read artifact");
        ApiError::internal("download failed")
    })?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type_for(&path))
        .header(CONTENT_DISPOSITION, attachment_header(&path))
        .body(Body::from(bytes))
        .map_err(|err| {
            state.telemetry.inc_download("failed");
            error!(error = %err, "failed to build download response");
            ApiError::internal("download failed")
        })?;
    state.telemetry.inc_download("served");
    Ok(response)
}

const fn download_label(err: &FsOpsError) -> &'static str {
    if err.is_not_found() {
        "not_found"
    } else if matches!(err, FsOpsError::InvalidInput { .. }) {
        "rejected"
    } else {
        "failed"
    }
}

fn content_type_for(path: &Path) -> &'static str {
    if path.to_string_lossy().ends_with(TORRENT_EXTENSION) {
        CONTENT_TYPE_TORRENT
    } else {
        CONTENT_TYPE_OCTET_STREAM
    }
}

fn attachment_header(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    format!("attachment; filename=\"{escaped}\"")
}
