//! Value types describing a directory snapshot.

use std::cmp::Ordering;
use std::path::PathBuf;

/// Snapshot of a single filesystem entry taken at listing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Final path component, lossily converted to UTF-8.
    pub name: String,
    /// Absolute path of the entry.
    pub absolute_path: PathBuf,
    /// Whether the entry (after following symlinks) is a directory.
    pub is_directory: bool,
    /// Size in bytes; always zero for directories.
    pub size_bytes: u64,
}

impl DirectoryEntry {
    /// Listing order: directories before files, then byte-wise by name.
    ///
    /// Byte-wise comparison of UTF-8 names equals codepoint order and is independent
    /// of locale and filesystem collation.
    #[must_use]
    pub fn listing_order(&self, other: &Self) -> Ordering {
        other
            .is_directory
            .cmp(&self.is_directory)
            .then_with(|| self.name.as_bytes().cmp(other.name.as_bytes()))
            .then_with(|| self.absolute_path.cmp(&other.absolute_path))
    }
}

/// Result of listing one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Canonical path that was listed.
    pub current_path: PathBuf,
    /// Parent to navigate "up" to; `None` at the browse root or the filesystem root.
    pub parent_path: Option<PathBuf>,
    /// Children in listing order; empty when `current_path` is not a directory.
    pub entries: Vec<DirectoryEntry>,
}
