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

//! HTTP surface for browsing sources, authoring metafiles and moving artifacts.
//!
//! Layout: `error.rs` (server errors), `models.rs` (wire DTOs), `state.rs`
//! (shared handler state), `http/` (router, middleware and handlers).

pub mod error;
pub(crate) mod http;
pub mod models;
pub(crate) mod state;

pub use error::{ApiServerError, ApiServerResult};
pub use http::router::{ApiDependencies, ApiServer};
