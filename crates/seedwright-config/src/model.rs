//! Typed server configuration.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Fully parsed configuration for a server instance.
///
/// Constructed once at startup and handed to each component by value, so tests
/// can run with isolated roots side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Top-level directory exposed to directory listing requests.
    pub browse_root: PathBuf,
    /// Directory where generated artifacts and uploaded files are stored.
    pub output_dir: PathBuf,
    /// Listener address.
    pub bind_addr: IpAddr,
    /// Listener port.
    pub http_port: u16,
    /// Program invoked to author torrent metafiles.
    pub tool_binary: PathBuf,
    /// Optional directory of static frontend assets.
    pub static_dir: Option<PathBuf>,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Requested log format, if any.
    pub log_format: Option<String>,
}

impl ServerConfig {
    /// Socket address the HTTP listener binds to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.http_port)
    }
}
