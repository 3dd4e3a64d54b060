//! Environment loader and directory preparation for [`ServerConfig`].
//!
//! # Design
//! - Read every value through an injectable lookup so tests never mutate the process env.
//! - Create and canonicalise the browse/output roots once, before any request is served,
//!   so later path comparisons are exact.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::defaults::{
    DEFAULT_BIND_ADDR, DEFAULT_DATA_DIR, DEFAULT_LOG_LEVEL, DEFAULT_MKTORRENT_BIN,
    DEFAULT_OUTPUT_DIR, DEFAULT_PORT, ENV_BIND_ADDR, ENV_DATA_DIR, ENV_LOG_FORMAT, ENV_LOG_LEVEL,
    ENV_MKTORRENT_BIN, ENV_OUTPUT_DIR, ENV_PORT, ENV_STATIC_DIR,
};
use crate::error::{ConfigError, ConfigResult};
use crate::model::ServerConfig;
use crate::validate::{parse_bind_addr, parse_dir, parse_log_format, parse_port};

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when a variable is present but malformed.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration using the supplied variable lookup.
    ///
    /// Unset or blank optional variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when a variable is present but malformed.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).filter(|raw| !raw.trim().is_empty());

        let browse_root = parse_dir(
            ENV_DATA_DIR,
            value(ENV_DATA_DIR).as_deref().unwrap_or(DEFAULT_DATA_DIR),
        )?;
        let output_dir = parse_dir(
            ENV_OUTPUT_DIR,
            value(ENV_OUTPUT_DIR)
                .as_deref()
                .unwrap_or(DEFAULT_OUTPUT_DIR),
        )?;
        let http_port = match value(ENV_PORT) {
            Some(raw) => parse_port(ENV_PORT, &raw)?,
            None => DEFAULT_PORT,
        };
        let bind_addr = parse_bind_addr(
            ENV_BIND_ADDR,
            value(ENV_BIND_ADDR)
                .as_deref()
                .unwrap_or(DEFAULT_BIND_ADDR),
        )?;
        let tool_binary = PathBuf::from(
            value(ENV_MKTORRENT_BIN).unwrap_or_else(|| DEFAULT_MKTORRENT_BIN.to_string()),
        );
        let static_dir = value(ENV_STATIC_DIR)
            .map(|raw| parse_dir(ENV_STATIC_DIR, &raw))
            .transpose()?;
        let log_level = value(ENV_LOG_LEVEL).map_or_else(
            || DEFAULT_LOG_LEVEL.to_string(),
            |raw| raw.trim().to_string(),
        );
        let log_format = value(ENV_LOG_FORMAT)
            .map(|raw| parse_log_format(ENV_LOG_FORMAT, &raw))
            .transpose()?;

        Ok(Self {
            browse_root,
            output_dir,
            bind_addr,
            http_port,
            tool_binary,
            static_dir,
            log_level,
            log_format,
        })
    }

    /// Create the browse and output directories when absent and canonicalise both.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when a directory cannot be created or resolved.
    pub async fn prepare(mut self) -> ConfigResult<Self> {
        self.browse_root = ensure_directory(&self.browse_root).await?;
        self.output_dir = ensure_directory(&self.output_dir).await?;
        info!(
            browse_root = %self.browse_root.display(),
            output_dir = %self.output_dir.display(),
            "server directories ready"
        );
        Ok(self)
    }
}

async fn ensure_directory(path: &Path) -> ConfigResult<PathBuf> {
    fs::create_dir_all(path)
        .await
        .map_err(|source| ConfigError::Io {
            operation: "config.create_dir",
            path: path.to_path_buf(),
            source,
        })?;
    fs::canonicalize(path)
        .await
        .map_err(|source| ConfigError::Io {
            operation: "config.canonicalize",
            path: path.to_path_buf(),
            source,
        })
}
