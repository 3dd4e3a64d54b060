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

//! Telemetry primitives shared across the Seedwright workspace.
//!
//! This crate centralises logging, metrics, and request-scoped tracing helpers so the
//! HTTP surface and the job runner adopt a consistent observability story.
//!
//! Layout: `init.rs` (subscriber setup), `context.rs` (spans, request scope and
//! request-id middleware), `metrics.rs` (Prometheus registry), `error.rs` (errors).

pub mod context;
pub mod error;
pub mod init;
pub mod metrics;

pub use context::{ProcessSpan, RequestScope, assign_request_id_layer, echo_request_id_layer};
pub use error::{CollectorStage, Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
pub use metrics::{JobOutcomeLabel, Metrics, MetricsSnapshot};
