//! Temporary directory trees for browse and output roots.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Self-cleaning directory tree whose root is already canonical.
pub struct TempTree {
    _dir: TempDir,
    root: PathBuf,
}

impl TempTree {
    /// Create an empty tree under the system temp directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or canonicalised.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("failed to create temp tree")?;
        let root = dir
            .path()
            .canonicalize()
            .context("failed to canonicalise temp tree")?;
        Ok(Self { _dir: dir, root })
    }

    /// Canonical root of the tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a directory (and parents) relative to the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn dir(&self, relative: &str) -> Result<PathBuf> {
        let path = self.root.join(relative);
        fs::create_dir_all(&path)
            .with_context(|| format!("failed to create '{}'", path.display()))?;
        Ok(path)
    }

    /// Write a file relative to the root, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn file(&self, relative: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create '{}'", parent.display()))?;
        }
        fs::write(&path, contents)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        Ok(path)
    }
}
