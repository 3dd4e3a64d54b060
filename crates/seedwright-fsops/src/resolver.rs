//! Resolve user-supplied path strings to canonical absolute paths.

use std::path::PathBuf;

use tokio::fs;

use crate::error::{FsOpsError, FsOpsResult};

/// Resolves browse requests against the configured browse root.
///
/// Resolution is not confined to the root: deployments are trusted to mount only
/// the trees they intend to expose.
#[derive(Debug, Clone)]
pub struct PathResolver {
    browse_root: PathBuf,
}

impl PathResolver {
    /// Construct a resolver for the given (canonical) browse root.
    #[must_use]
    pub const fn new(browse_root: PathBuf) -> Self {
        Self { browse_root }
    }

    /// Resolve `raw` to an absolute, canonical path that exists.
    ///
    /// An empty or all-whitespace input yields the browse root. Otherwise `.`/`..` segments and
    /// symlinks are resolved; relative inputs are anchored at the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::NotFound`] when the path does not exist and
    /// [`FsOpsError::Io`] for any other lookup failure.
    pub async fn resolve(&self, raw: &str) -> FsOpsResult<PathBuf> {
        if raw.trim().is_empty() {
            return Ok(self.browse_root.clone());
        }
        let requested = PathBuf::from(raw);
        fs::canonicalize(&requested)
            .await
            .map_err(|source| FsOpsError::from_io("fsops.resolve", &requested, source))
    }
}
