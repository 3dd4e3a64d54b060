//! Failures from browsing, downloads and upload storage.
//!
//! Messages stay fixed; the path, field or operation involved travels in the variant.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias for [`FsOpsError`].
pub type FsOpsResult<T> = Result<T, FsOpsError>;

/// Filesystem failure with the context needed to map it onto an HTTP status.
#[derive(Debug, Error)]
pub enum FsOpsError {
    /// The requested path does not exist.
    #[error("fsops path not found")]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },
    /// A caller-supplied name or path was unusable.
    #[error("fsops invalid input")]
    InvalidInput {
        /// Request parameter the value came from.
        field: &'static str,
        /// Machine-readable rejection reason, e.g. `empty`.
        reason: &'static str,
        /// Rejected value.
        value: Option<String>,
    },
    /// Any other IO error.
    #[error("fsops io failure")]
    Io {
        /// Dotted operation name, e.g. `fsops.list.read_dir`.
        operation: &'static str,
        /// Path being accessed.
        path: PathBuf,
        /// Error from the OS.
        source: io::Error,
    },
}

impl FsOpsError {
    /// Classify an IO error, folding `NotFound` into [`FsOpsError::NotFound`].
    #[must_use]
    pub fn from_io(operation: &'static str, path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                operation,
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Returns `true` when the error represents a missing path.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
