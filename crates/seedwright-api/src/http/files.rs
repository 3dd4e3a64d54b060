//! Directory browsing endpoint.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::debug;

use crate::http::errors::ApiError;
use crate::models::ListingResponse;
use crate::state::ApiState;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FilesQuery {
    pub(crate) path: Option<String>,
}

pub(crate) async fn list_files(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<FilesQuery>,
) -> Result<Json<ListingResponse>, ApiError> {
    let raw = query.path.unwrap_or_default();
    let target = state
        .resolver
        .resolve(&raw)
        .await
        .map_err(|err| ApiError::from_fsops(&err, "path not found"))?;
    let listing = state
        .lister
        .list(&target)
        .await
        .map_err(|err| ApiError::from_fsops(&err, "path not found"))?;
    state.telemetry.inc_directory_listing();
    debug!(
        path = %listing.current_path.display(),
        entries = listing.entries.len(),
        "directory listed"
    );
    Ok(Json(ListingResponse::from(listing)))
}
