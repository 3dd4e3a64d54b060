#![forbid(unsafe_code)]
#![deny(
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Torrent authoring jobs delegated to an external tool.
//!
//! Layout: `model.rs` (validated requests and terminal results), `naming.rs`
//! (artifact names), `command.rs` (argument vectors), `runner.rs` (process
//! lifecycle and stream draining), `error.rs` (validation errors).

pub mod command;
pub mod error;
pub mod model;
pub mod naming;
pub mod runner;

pub use command::{CommandBuilder, JobCommand};
pub use error::{FieldViolation, JobError, JobField, JobResult};
pub use model::{JobOutcome, PieceSizeExponent, TorrentJobRequest, TorrentJobResult};
pub use naming::{TORRENT_EXTENSION, derive_name};
pub use runner::{JobExecutor, ProcessJobRunner};
