//! Global subscriber installation.
//!
//! The binary installs exactly one subscriber at start-up. `RUST_LOG` wins over the
//! configured level when both are present.

use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, TelemetryError};

/// Filter applied when neither `RUST_LOG` nor a configured level is available.
pub const DEFAULT_LOG_LEVEL: &str = "info";

const UNKNOWN_BUILD: &str = "dev";

static BUILD_SHA: OnceCell<String> = OnceCell::new();

/// Subscriber settings derived from the server configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: &'a str,
    /// Line format.
    pub format: LogFormat,
    /// Build identifier attached to the process span and the health document.
    pub build_sha: &'a str,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::for_build(),
            build_sha: option_env!("SEEDWRIGHT_BUILD_SHA").unwrap_or(UNKNOWN_BUILD),
        }
    }
}

/// Line format written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event, fields flattened.
    Json,
    /// Compact human-readable lines.
    Pretty,
}

impl LogFormat {
    /// `Pretty` for debug builds, `Json` otherwise.
    #[must_use]
    pub const fn for_build() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }

    /// Parse `json` or `pretty` (case-insensitive). Anything else, including an absent
    /// value, falls back to [`LogFormat::for_build`].
    #[must_use]
    pub fn parse_or_default(name: Option<&str>) -> Self {
        let Some(name) = name.map(str::trim) else {
            return Self::for_build();
        };
        if name.eq_ignore_ascii_case("json") {
            Self::Json
        } else if name.eq_ignore_ascii_case("pretty") {
            Self::Pretty
        } else {
            Self::for_build()
        }
    }

    /// Lower-case name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
        }
    }
}

/// Install the process-wide subscriber and remember the build identifier.
///
/// # Errors
///
/// Returns [`TelemetryError::Subscriber`] when a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig<'_>) -> Result<()> {
    let _ = BUILD_SHA.set(config.build_sha.to_owned());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level));
    let lines = fmt::layer().with_target(false).with_thread_ids(false);
    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Json => registry.with(lines.json().flatten_event(true)).try_init(),
        LogFormat::Pretty => registry.with(lines.compact()).try_init(),
    };
    installed.map_err(|source| TelemetryError::Subscriber {
        format: config.format.as_str(),
        source,
    })
}

/// Build identifier recorded by [`init_logging`], or `dev` before initialisation.
#[must_use]
pub fn build_sha() -> &'static str {
    BUILD_SHA.get().map_or(UNKNOWN_BUILD, String::as_str)
}
