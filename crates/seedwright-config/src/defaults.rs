//! Environment variable names and fallback values.
//!
//! # Design
//! - Keep every variable name in one place so deployment docs and code stay aligned.
//! - Fallbacks mirror the container layout (`/data` mounted read-only, `/output` writable).

/// Browse root exposed to directory listing requests.
pub const ENV_DATA_DIR: &str = "DATA_DIR";
/// Directory receiving generated artifacts and uploads.
pub const ENV_OUTPUT_DIR: &str = "OUTPUT_DIR";
/// HTTP listener port.
pub const ENV_PORT: &str = "PORT";
/// HTTP listener address.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
/// Program invoked to author torrent metafiles.
pub const ENV_MKTORRENT_BIN: &str = "MKTORRENT_BIN";
/// Optional directory holding the built frontend.
pub const ENV_STATIC_DIR: &str = "STATIC_DIR";
/// Log output format (`json` or `pretty`).
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
/// Log level used when `RUST_LOG` is not set.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Default browse root.
pub const DEFAULT_DATA_DIR: &str = "/data";
/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "/output";
/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;
/// Default bind address (all interfaces; the service runs inside a container).
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
/// Default external tool.
pub const DEFAULT_MKTORRENT_BIN: &str = "mktorrent";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
