//! Job requests and terminal results.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use uuid::Uuid;

use crate::error::{FieldViolation, JobError, JobField, JobResult};

/// Power-of-two piece length passed to the tool as `-l`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceSizeExponent(u8);

impl PieceSizeExponent {
    /// Smallest accepted exponent.
    pub const MIN: u8 = 1;
    /// Largest accepted exponent.
    pub const MAX: u8 = 27;
    /// Exponent used when the caller omits one (2 MiB pieces).
    pub const DEFAULT: Self = Self(21);

    /// Construct an exponent, rejecting values outside `[MIN, MAX]`.
    #[must_use]
    pub fn new(value: i64) -> Option<Self> {
        u8::try_from(value)
            .ok()
            .filter(|exp| (Self::MIN..=Self::MAX).contains(exp))
            .map(Self)
    }

    /// Parse the textual form accepted on the wire.
    ///
    /// # Errors
    ///
    /// Returns the violation reason when the text is not an integer or is out of range.
    pub fn parse(raw: &str) -> Result<Self, &'static str> {
        let value: i64 = raw.trim().parse().map_err(|_| "not_a_number")?;
        Self::new(value).ok_or("out_of_range")
    }

    /// Raw exponent.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for PieceSizeExponent {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PieceSizeExponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated request to author one metafile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentJobRequest {
    source_path: String,
    announce_url: String,
    output_name: String,
    piece_size: PieceSizeExponent,
}

impl TorrentJobRequest {
    /// Validate raw request fields.
    ///
    /// `piece_size` is the textual exponent; `None` selects the default.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Validation`] listing every missing or malformed field.
    pub fn new(
        source_path: impl Into<String>,
        announce_url: impl Into<String>,
        output_name: impl Into<String>,
        piece_size: Option<&str>,
    ) -> JobResult<Self> {
        let source_path = source_path.into();
        let announce_url = announce_url.into();
        let output_name = output_name.into();
        let mut violations = Vec::new();

        if source_path.trim().is_empty() {
            violations.push(violation(JobField::SourcePath, "required"));
        }
        if announce_url.trim().is_empty() {
            violations.push(violation(JobField::AnnounceUrl, "required"));
        }
        if let Err(reason) = check_output_name(&output_name) {
            violations.push(violation(JobField::OutputName, reason));
        }
        let piece_size = match piece_size.map(PieceSizeExponent::parse) {
            None => PieceSizeExponent::DEFAULT,
            Some(Ok(exp)) => exp,
            Some(Err(reason)) => {
                violations.push(violation(JobField::PieceSize, reason));
                PieceSizeExponent::DEFAULT
            }
        };

        if violations.is_empty() {
            Ok(Self {
                source_path,
                announce_url,
                output_name,
                piece_size,
            })
        } else {
            Err(JobError::Validation { violations })
        }
    }

    /// File or directory to describe.
    #[must_use]
    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    /// Tracker announce URL.
    #[must_use]
    pub fn announce_url(&self) -> &str {
        &self.announce_url
    }

    /// Requested artifact name, before the extension is ensured.
    #[must_use]
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Piece-size exponent.
    #[must_use]
    pub const fn piece_size(&self) -> PieceSizeExponent {
        self.piece_size
    }
}

const fn violation(field: JobField, reason: &'static str) -> FieldViolation {
    FieldViolation { field, reason }
}

fn check_output_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("required");
    }
    if name.contains(['/', '\\', '\0']) {
        return Err("not_a_file_name");
    }
    if name == "." || name == ".." {
        return Err("not_a_file_name");
    }
    Ok(())
}

/// How a job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// Tool exited with status 0.
    Succeeded,
    /// Tool exited with a non-zero status.
    ExitedNonZero,
    /// Tool was terminated by a signal.
    Signalled,
    /// Tool could not be started.
    LaunchFailed,
}

/// Failure reason recorded for non-zero exits.
pub const REASON_NON_ZERO: &str = "external tool exited non-zero";
/// Failure reason recorded for signal terminations.
pub const REASON_SIGNALLED: &str = "external tool terminated by signal";

/// Terminal record of a single job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentJobResult {
    /// Correlation id attached to every log line of the job.
    pub job_id: Uuid,
    /// Whether the tool exited with status 0.
    pub succeeded: bool,
    /// Where the metafile was (or would have been) written.
    pub output_path: PathBuf,
    /// Captured output: stdout on success, stderr followed by stdout otherwise.
    pub combined_log: String,
    /// Process exit code, absent when the tool never ran or was signalled.
    pub exit_code: Option<i32>,
    /// Human-readable failure reason.
    pub failure_reason: Option<String>,
    /// Wall-clock time from spawn to completion.
    pub elapsed: Duration,
    /// Classified outcome.
    pub outcome: JobOutcome,
}

impl TorrentJobResult {
    /// Result for a tool that exited with status 0.
    #[must_use]
    pub fn succeeded(job_id: Uuid, output_path: PathBuf, stdout: &[u8], elapsed: Duration) -> Self {
        Self {
            job_id,
            succeeded: true,
            output_path,
            combined_log: String::from_utf8_lossy(stdout).into_owned(),
            exit_code: Some(0),
            failure_reason: None,
            elapsed,
            outcome: JobOutcome::Succeeded,
        }
    }

    /// Result for a tool that ran but did not succeed. `exit_code` is `None` for signals.
    #[must_use]
    pub fn failed(
        job_id: Uuid,
        output_path: PathBuf,
        exit_code: Option<i32>,
        stdout: &[u8],
        stderr: &[u8],
        elapsed: Duration,
    ) -> Self {
        let mut combined_log = String::from_utf8_lossy(stderr).into_owned();
        combined_log.push_str(&String::from_utf8_lossy(stdout));
        let (reason, outcome) = if exit_code.is_some() {
            (REASON_NON_ZERO, JobOutcome::ExitedNonZero)
        } else {
            (REASON_SIGNALLED, JobOutcome::Signalled)
        };
        Self {
            job_id,
            succeeded: false,
            output_path,
            combined_log,
            exit_code,
            failure_reason: Some(reason.to_string()),
            elapsed,
            outcome,
        }
    }

    /// Result for a tool that could not be started or waited on.
    #[must_use]
    pub fn launch_failed(
        job_id: Uuid,
        output_path: PathBuf,
        reason: String,
        elapsed: Duration,
    ) -> Self {
        Self {
            job_id,
            succeeded: false,
            output_path,
            combined_log: String::new(),
            exit_code: None,
            failure_reason: Some(reason),
            elapsed,
            outcome: JobOutcome::LaunchFailed,
        }
    }
}
