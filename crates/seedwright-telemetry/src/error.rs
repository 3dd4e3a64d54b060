//! Failures raised while wiring logging and metrics.

use std::string::FromUtf8Error;

use thiserror::Error;
use tracing_subscriber::util::TryInitError;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Point in a collector's lifecycle at which Prometheus rejected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorStage {
    /// Building the collector from its options.
    Build,
    /// Adding the collector to the registry.
    Register,
}

/// Errors raised by telemetry helpers.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber was already installed, or installation was refused.
    #[error("tracing subscriber could not be installed")]
    Subscriber {
        /// Output format that was being installed.
        format: &'static str,
        /// Error reported by `tracing-subscriber`.
        source: TryInitError,
    },
    /// A collector could not be built or registered.
    #[error("metric collector rejected")]
    Collector {
        /// Metric family name.
        metric: &'static str,
        /// Lifecycle stage that failed.
        stage: CollectorStage,
        /// Error reported by Prometheus.
        source: prometheus::Error,
    },
    /// The registry could not be encoded in the text exposition format.
    #[error("metrics exposition could not be encoded")]
    Exposition {
        /// Error reported by Prometheus.
        source: prometheus::Error,
    },
    /// The encoded exposition was not UTF-8.
    #[error("metrics exposition was not utf-8")]
    ExpositionText {
        /// Conversion error.
        source: FromUtf8Error,
    },
}
