//! Start-up and serving failures surfaced by the binary.

use seedwright_api::ApiServerError;
use seedwright_config::ConfigError;
use seedwright_telemetry::TelemetryError;
use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Reasons the server process exits with an error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Environment settings were invalid, or the roots could not be prepared.
    #[error("server configuration rejected")]
    Config {
        /// Boot stage that failed, e.g. `config.prepare`.
        stage: &'static str,
        /// Configuration error.
        source: ConfigError,
    },
    /// Logging or metrics could not be set up.
    #[error("telemetry could not be initialised")]
    Telemetry {
        /// Boot stage that failed, e.g. `telemetry.logging`.
        stage: &'static str,
        /// Telemetry error.
        source: TelemetryError,
    },
    /// The HTTP server could not listen or stopped unexpectedly.
    #[error("api server failed")]
    Server(#[from] ApiServerError),
}

impl AppError {
    /// Adapter for `map_err` that tags a configuration error with its boot stage.
    pub(crate) fn config(stage: &'static str) -> impl FnOnce(ConfigError) -> Self {
        move |source| Self::Config { stage, source }
    }

    /// Adapter for `map_err` that tags a telemetry error with its boot stage.
    pub(crate) fn telemetry(stage: &'static str) -> impl FnOnce(TelemetryError) -> Self {
        move |source| Self::Telemetry { stage, source }
    }
}
