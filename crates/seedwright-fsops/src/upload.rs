//! Storage for auxiliary uploads (NFO files) placed next to generated artifacts.

use std::path::PathBuf;

use tokio::fs;
use tracing::info;

use crate::error::{FsOpsError, FsOpsResult};
use crate::gateway::sanitize_file_name;

/// Writes uploaded files into the output directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    output_dir: PathBuf,
}

impl UploadStore {
    /// Construct a store rooted at the (canonical) output directory.
    #[must_use]
    pub const fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Persist `bytes` under the final segment of `original_name`, replacing any
    /// existing file, and return the stored path.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::InvalidInput`] for unusable names and [`FsOpsError::Io`]
    /// when the write fails.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> FsOpsResult<PathBuf> {
        let file_name = sanitize_file_name(original_name)?;
        let path = self.output_dir.join(file_name);
        fs::write(&path, bytes)
            .await
            .map_err(|source| FsOpsError::Io {
                operation: "fsops.upload.write",
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), bytes = bytes.len(), "stored upload");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[tokio::test]
    async fn store_writes_into_output_dir() -> Result<()> {
        let output = tempfile::tempdir()?;
        let output_path = output.path().canonicalize()?;
        let store = UploadStore::new(output_path.clone());

        let stored = store.store("../release.nfo", b"release notes").await?;
        assert_eq!(stored, output_path.join("release.nfo"));
        assert_eq!(std::fs::read(&stored)?, b"release notes");

        let replaced = store.store("release.nfo", b"v2").await?;
        assert_eq!(std::fs::read(replaced)?, b"v2");
        Ok(())
    }

    #[tokio::test]
    async fn store_rejects_unusable_names() -> Result<()> {
        let output = tempfile::tempdir()?;
        let store = UploadStore::new(output.path().to_path_buf());
        assert!(matches!(
            store.store("..", b"x").await,
            Err(FsOpsError::InvalidInput { .. })
        ));
        Ok(())
    }
}
