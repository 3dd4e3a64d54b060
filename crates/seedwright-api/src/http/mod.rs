//! HTTP surface modules (router, middleware, handlers).

/// Shared constants and header names.
pub(crate) mod constants;
/// Torrent authoring handler.
pub(crate) mod create;
/// Artifact download handler.
pub(crate) mod download;
/// Problem response helpers and error types.
pub(crate) mod errors;
/// Directory browsing handler.
pub(crate) mod files;
/// Health and metrics endpoints.
pub(crate) mod health;
/// Router construction and server host.
pub(crate) mod router;
/// Metrics middleware for HTTP requests.
pub(crate) mod telemetry;
/// Sidecar upload handler.
pub(crate) mod upload;
