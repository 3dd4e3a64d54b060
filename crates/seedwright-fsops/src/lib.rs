//! Filesystem browsing and artifact storage primitives.
#![forbid(unsafe_code)]
#![deny(
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

//! Layout: `resolver.rs` (user path → canonical path), `listing.rs` (sorted
//! directory snapshots), `gateway.rs` (download confinement), `upload.rs`
//! (auxiliary file storage), `model/` (listing value types), `error.rs`.
//!
//! Every component takes its roots at construction; nothing here reads global state.

pub mod error;
pub mod gateway;
pub mod listing;
pub mod model;
pub mod resolver;
pub mod upload;

pub use error::{FsOpsError, FsOpsResult};
pub use gateway::{DownloadGateway, sanitize_file_name};
pub use listing::DirectoryLister;
pub use model::{DirectoryEntry, Listing};
pub use resolver::PathResolver;
pub use upload::UploadStore;
