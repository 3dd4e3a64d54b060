use seedwright_api::{ApiDependencies, ApiServer};
use seedwright_config::ServerConfig;
use seedwright_telemetry::{LogFormat, LoggingConfig, Metrics, ProcessSpan};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Dependencies required to bootstrap the Seedwright server.
pub(crate) struct BootstrapDependencies {
    config: ServerConfig,
    telemetry: Metrics,
}

impl BootstrapDependencies {
    /// Construct production dependencies from the environment for the binary entrypoint.
    pub(crate) fn from_env() -> AppResult<Self> {
        let config = ServerConfig::from_env().map_err(AppError::config("config.from_env"))?;
        Self::new(config)
    }

    pub(crate) fn new(config: ServerConfig) -> AppResult<Self> {
        let telemetry = Metrics::new().map_err(AppError::telemetry("telemetry.metrics"))?;
        Ok(Self { config, telemetry })
    }
}

/// Entry point for the Seedwright boot sequence.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the roots cannot be prepared,
/// or the listener fails.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    seedwright_telemetry::init_logging(&logging_config(&dependencies.config))
        .map_err(AppError::telemetry("telemetry.logging"))?;
    run_app_with(dependencies).await
}

/// Boot sequence that relies entirely on injected dependencies to simplify testing.
pub(crate) async fn run_app_with(dependencies: BootstrapDependencies) -> AppResult<()> {
    let _span = ProcessSpan::enter("bootstrap");
    info!("Seedwright bootstrap starting");

    let BootstrapDependencies { config, telemetry } = dependencies;
    let config = config
        .prepare()
        .await
        .map_err(AppError::config("config.prepare"))?;
    info!(
        browse_root = %config.browse_root.display(),
        output_dir = %config.output_dir.display(),
        tool = %config.tool_binary.display(),
        static_dir = ?config.static_dir,
        addr = %config.socket_addr(),
        "server configured"
    );

    let api = ApiServer::new(&ApiDependencies::from_config(&config), telemetry);
    api.serve(config.socket_addr()).await?;
    Ok(())
}

fn logging_config(config: &ServerConfig) -> LoggingConfig<'_> {
    LoggingConfig {
        level: &config.log_level,
        format: LogFormat::parse_or_default(config.log_format.as_deref()),
        ..LoggingConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use seedwright_test_support::fixtures::TempTree;

    fn config_for(tree: &TempTree, port: u16) -> Result<ServerConfig> {
        let data = tree.root().join("data").to_string_lossy().into_owned();
        let output = tree.root().join("output").to_string_lossy().into_owned();
        let port = port.to_string();
        Ok(ServerConfig::from_lookup(|name| match name {
            "DATA_DIR" => Some(data.clone()),
            "OUTPUT_DIR" => Some(output.clone()),
            "BIND_ADDR" => Some("127.0.0.1".to_string()),
            "PORT" => Some(port.clone()),
            "LOG_FORMAT" => Some("json".to_string()),
            "LOG_LEVEL" => Some("debug".to_string()),
            _ => None,
        })?)
    }

    #[test]
    fn logging_config_follows_server_config() -> Result<()> {
        let tree = TempTree::new()?;
        let config = config_for(&tree, 3000)?;
        let logging = logging_config(&config);
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, LogFormat::Json);
        Ok(())
    }

    #[tokio::test]
    async fn bootstrap_prepares_roots_before_failing_to_bind() -> Result<()> {
        let tree = TempTree::new()?;
        let occupied = std::net::TcpListener::bind("127.0.0.1:0")?;
        let config = config_for(&tree, occupied.local_addr()?.port())?;

        let err = run_app_with(BootstrapDependencies::new(config)?)
            .await
            .err()
            .ok_or_else(|| anyhow!("expected bind failure"))?;
        assert!(matches!(err, AppError::Server(_)));
        assert!(tree.root().join("data").is_dir());
        assert!(tree.root().join("output").is_dir());
        Ok(())
    }
}
