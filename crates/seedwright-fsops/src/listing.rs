//! Directory snapshots for the browse surface.
//!
//! # Design
//! - A child that cannot be stat'ed is skipped; the rest of the listing is still returned.
//! - A read error part-way through the directory ends the listing with the entries seen so far.
//! - Output is deterministic (see [`DirectoryEntry::listing_order`]).
//! - The "up" link stops at the browse root. This is a navigation aid, not a security boundary.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{self, DirEntry};
use tracing::debug;

use crate::error::{FsOpsError, FsOpsResult};
use crate::model::{DirectoryEntry, Listing};

/// Produces [`Listing`] snapshots of resolved paths.
#[derive(Debug, Clone)]
pub struct DirectoryLister {
    browse_root: PathBuf,
}

impl DirectoryLister {
    /// Construct a lister for the given (canonical) browse root.
    #[must_use]
    pub const fn new(browse_root: PathBuf) -> Self {
        Self { browse_root }
    }

    /// List the immediate children of `path`.
    ///
    /// A path that is not a directory yields an empty listing rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::NotFound`] when `path` vanished since resolution and
    /// [`FsOpsError::Io`] when the directory itself cannot be read.
    pub async fn list(&self, path: &Path) -> FsOpsResult<Listing> {
        let metadata = fs::metadata(path)
            .await
            .map_err(|source| FsOpsError::from_io("fsops.list.stat", path, source))?;
        let parent_path = self.parent_of(path);

        if !metadata.is_dir() {
            return Ok(Listing {
                current_path: path.to_path_buf(),
                parent_path,
                entries: Vec::new(),
            });
        }

        let mut reader = fs::read_dir(path)
            .await
            .map_err(|source| FsOpsError::from_io("fsops.list.read_dir", path, source))?;
        let mut entries = Vec::new();
        while let Some(entry) = continue_reading(path, reader.next_entry().await) {
            if let Some(snapshot) = snapshot_entry(&entry).await {
                entries.push(snapshot);
            }
        }
        entries.sort_by(DirectoryEntry::listing_order);

        Ok(Listing {
            current_path: path.to_path_buf(),
            parent_path,
            entries,
        })
    }

    fn parent_of(&self, path: &Path) -> Option<PathBuf> {
        if path == self.browse_root {
            return None;
        }
        path.parent().map(Path::to_path_buf)
    }
}

/// Unwrap one directory read step; an error ends the listing with what was read so far.
fn continue_reading<T>(path: &Path, step: io::Result<Option<T>>) -> Option<T> {
    step.unwrap_or_else(|err| {
        debug!(path = %path.display(), error = %err, "directory read interrupted");
        None
    })
}

async fn snapshot_entry(entry: &DirEntry) -> Option<DirectoryEntry> {
    let absolute_path = entry.path();
    match fs::metadata(&absolute_path).await {
        Ok(metadata) => {
            let is_directory = metadata.is_dir();
            Some(DirectoryEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                absolute_path,
                is_directory,
                size_bytes: if is_directory { 0 } else { metadata.len() },
            })
        }
        Err(err) => {
            debug!(
                path = %absolute_path.display(),
                error = %err,
                "skipping entry that could not be stat'ed"
            );
            None
        }
    }
}
