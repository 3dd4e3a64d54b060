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

//! Environment-driven configuration for the Seedwright server.
//!
//! Layout: `defaults.rs` (variable names and fallbacks), `model.rs` (typed
//! `ServerConfig`), `validate.rs` (parsing helpers), `loader.rs` (environment
//! lookup and directory preparation).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use model::ServerConfig;
