//! Server-level failures.
//!
//! Per-request failures never reach this type; handlers turn them into problem
//! documents (see `http::errors`).

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Result alias for [`ApiServerError`].
pub type ApiServerResult<T> = Result<T, ApiServerError>;

/// Reasons the HTTP server stops before shutdown was requested.
#[derive(Debug, Error)]
pub enum ApiServerError {
    /// The listening socket could not be opened.
    #[error("api listener could not be opened")]
    Listen {
        /// Requested address.
        addr: SocketAddr,
        /// Socket error.
        source: io::Error,
    },
    /// The accept loop exited with an error.
    #[error("api server stopped unexpectedly")]
    Stopped {
        /// Error returned by the accept loop.
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn listen_errors_report_the_address() {
        let addr = SocketAddr::from(([127, 0, 0, 1], 3001));
        let err = ApiServerError::Listen {
            addr,
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        assert!(matches!(err, ApiServerError::Listen { addr: reported, .. } if reported == addr));
        assert_eq!(err.to_string(), "api listener could not be opened");
        assert!(
            err.source()
                .and_then(|source| source.downcast_ref::<io::Error>())
                .is_some_and(|source| source.kind() == io::ErrorKind::AddrInUse)
        );
    }

    #[test]
    fn stopped_servers_keep_the_accept_error() {
        let err = ApiServerError::Stopped {
            source: io::Error::other("accept failed"),
        };
        assert_eq!(err.to_string(), "api server stopped unexpectedly");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("accept failed")
        );
    }
}
