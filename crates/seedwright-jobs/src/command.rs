//! Argument vectors for the external tool.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::model::TorrentJobRequest;
use crate::naming::derive_name;

const FLAG_VERBOSE: &str = "-v";
const FLAG_PRIVATE: &str = "-p";
const FLAG_PIECE_LENGTH: &str = "-l";
const FLAG_ANNOUNCE: &str = "-a";
const FLAG_OUTPUT: &str = "-o";

/// Program, arguments and destination for one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCommand {
    program: PathBuf,
    args: Vec<OsString>,
    output_path: PathBuf,
}

impl JobCommand {
    /// Tool binary, resolved through `PATH` when bare.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments in invocation order.
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Destination of the generated metafile.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

/// Builds [`JobCommand`]s against a fixed tool binary and output directory.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    tool_binary: PathBuf,
    output_dir: PathBuf,
}

impl CommandBuilder {
    /// Create a builder.
    #[must_use]
    pub const fn new(tool_binary: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            tool_binary,
            output_dir,
        }
    }

    /// Produce `-v -p -l <exp> -a <announce> -o <destination> <source>`.
    ///
    /// The source is not checked for existence; the tool reports that itself.
    #[must_use]
    pub fn build(&self, request: &TorrentJobRequest) -> JobCommand {
        let output_path = self.output_dir.join(derive_name(request.output_name()));
        let args = vec![
            OsString::from(FLAG_VERBOSE),
            OsString::from(FLAG_PRIVATE),
            OsString::from(FLAG_PIECE_LENGTH),
            OsString::from(request.piece_size().to_string()),
            OsString::from(FLAG_ANNOUNCE),
            OsString::from(request.announce_url()),
            OsString::from(FLAG_OUTPUT),
            output_path.clone().into_os_string(),
            OsString::from(request.source_path()),
        ];
        JobCommand {
            program: self.tool_binary.clone(),
            args,
            output_path,
        }
    }
}
