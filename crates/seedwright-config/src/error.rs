//! Configuration failures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why the server configuration could not be loaded or prepared.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held an unusable value.
    #[error("invalid configuration field")]
    InvalidField {
        /// Environment variable that failed validation.
        field: &'static str,
        /// Raw value, when one was set.
        value: Option<String>,
        /// Machine-readable reason, e.g. `not_a_number`.
        reason: &'static str,
    },
    /// Creating or canonicalising a root directory failed.
    #[error("configured directory could not be prepared")]
    Io {
        /// Dotted operation name, e.g. `config.create_dir`.
        operation: &'static str,
        /// Directory being prepared.
        path: PathBuf,
        /// Error from the OS.
        source: io::Error,
    },
}

/// Result alias for [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;
