//! Confine download requests to the output directory.
//!
//! # Design
//! - Only the final path segment of a request survives; `/` and `\` both count as separators.
//! - The gateway is the mandatory traversal guard for content served back to callers.

use std::path::PathBuf;

use tokio::fs;

use crate::error::{FsOpsError, FsOpsResult};

/// Reduce a user-supplied name to its final path segment.
///
/// # Errors
///
/// Returns [`FsOpsError::InvalidInput`] when no usable segment remains (empty input,
/// `.`, `..`) or the name contains a NUL byte.
pub fn sanitize_file_name(raw: &str) -> FsOpsResult<String> {
    let invalid = |reason| FsOpsError::InvalidInput {
        field: "file",
        reason,
        value: Some(raw.to_string()),
    };
    if raw.contains('\0') {
        return Err(invalid("nul_byte"));
    }
    let segment = raw
        .rsplit(|c: char| c == '/' || c == '\\')
        .find(|segment| !segment.is_empty())
        .ok_or_else(|| invalid("empty"))?;
    if matches!(segment, "." | "..") {
        return Err(invalid("no_file_component"));
    }
    Ok(segment.to_string())
}

/// Maps requested artifact names onto files inside the output directory.
#[derive(Debug, Clone)]
pub struct DownloadGateway {
    output_dir: PathBuf,
}

impl DownloadGateway {
    /// Construct a gateway rooted at the (canonical) output directory.
    #[must_use]
    pub const fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Resolve `requested` to an existing regular file directly inside the output directory.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::InvalidInput`] for names without a usable segment,
    /// [`FsOpsError::NotFound`] when no such file exists, and [`FsOpsError::Io`]
    /// for other lookup failures.
    pub async fn resolve_download(&self, requested: &str) -> FsOpsResult<PathBuf> {
        let file_name = sanitize_file_name(requested)?;
        let path = self.output_dir.join(file_name);
        let metadata = fs::metadata(&path)
            .await
            .map_err(|source| FsOpsError::from_io("fsops.download.stat", &path, source))?;
        if !metadata.is_file() {
            return Err(FsOpsError::NotFound { path });
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn sanitize_keeps_only_final_segment() -> FsOpsResult<()> {
        assert_eq!(sanitize_file_name("../../etc/passwd")?, "passwd");
        assert_eq!(sanitize_file_name("demo.torrent")?, "demo.torrent");
        assert_eq!(sanitize_file_name("..\\..\\boot.ini")?, "boot.ini");
        assert_eq!(sanitize_file_name("nested/dir/")?, "dir");
        Ok(())
    }

    #[test]
    fn sanitize_rejects_names_without_a_file_component() {
        for raw in ["", "/", "..", "../..", "./", "a\0b"] {
            assert!(
                matches!(
                    sanitize_file_name(raw),
                    Err(FsOpsError::InvalidInput { field: "file", .. })
                ),
                "expected rejection for {raw:?}"
            );
        }
    }

    #[tokio::test]
    async fn traversal_resolves_inside_output_dir() -> Result<()> {
        let output = tempfile::tempdir()?;
        let output_path = output.path().canonicalize()?;
        std::fs::write(output_path.join("passwd"), b"not the real one")?;

        let gateway = DownloadGateway::new(output_path.clone());
        let resolved = gateway.resolve_download("../../etc/passwd").await?;
        assert_eq!(resolved, output_path.join("passwd"));
        assert!(resolved.starts_with(&output_path));
        Ok(())
    }

    #[tokio::test]
    async fn missing_or_directory_targets_are_not_found() -> Result<()> {
        let output = tempfile::tempdir()?;
        let output_path = output.path().canonicalize()?;
        std::fs::create_dir(output_path.join("subdir"))?;
        let gateway = DownloadGateway::new(output_path);

        let missing = gateway.resolve_download("absent.torrent").await.err();
        assert!(missing.is_some_and(|err| err.is_not_found()));
        let directory = gateway.resolve_download("subdir").await.err();
        assert!(directory.is_some_and(|err| err.is_not_found()));
        Ok(())
    }
}
