//! Header names, content types and fixed response messages.

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

pub(crate) const CONTENT_TYPE_TORRENT: &str = "application/x-bittorrent";
pub(crate) const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";
pub(crate) const CONTENT_TYPE_METRICS: &str = "text/plain; version=0.0.4";

pub(crate) const UPLOAD_FIELD: &str = "nfo";
pub(crate) const UPLOAD_MESSAGE: &str = "NFO uploaded successfully";
pub(crate) const CREATE_MESSAGE: &str = "Torrent created successfully";
