//! # Design
//!
//! - Validation errors are detected before any process is spawned and never retried.
//! - Every violated field is reported at once so callers can render them together.
//! - Launch and exit failures are not errors here; they are terminal [`crate::TorrentJobResult`]s.

use thiserror::Error;

/// Result alias for job construction.
pub type JobResult<T> = Result<T, JobError>;

/// Fields of a torrent job request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobField {
    /// File or directory the metafile describes.
    SourcePath,
    /// Tracker announce URL.
    AnnounceUrl,
    /// Requested artifact name.
    OutputName,
    /// Piece-size exponent.
    PieceSize,
}

impl JobField {
    /// Stable identifier for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SourcePath => "source_path",
            Self::AnnounceUrl => "announce_url",
            Self::OutputName => "output_name",
            Self::PieceSize => "piece_size",
        }
    }
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Offending field.
    pub field: JobField,
    /// Machine-readable reason.
    pub reason: &'static str,
}

/// Errors raised while building a job.
#[derive(Debug, Error)]
pub enum JobError {
    /// One or more request fields were missing or malformed.
    #[error("invalid torrent job request")]
    Validation {
        /// Every violated field, in request order.
        violations: Vec<FieldViolation>,
    },
}

impl JobError {
    /// Violations carried by the error.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Validation { violations } => violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_exposes_violations() {
        let err = JobError::Validation {
            violations: vec![FieldViolation {
                field: JobField::AnnounceUrl,
                reason: "required",
            }],
        };
        assert_eq!(err.to_string(), "invalid torrent job request");
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].field.as_str(), "announce_url");
    }
}
