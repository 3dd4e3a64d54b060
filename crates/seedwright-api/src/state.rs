//! Shared state handed to every handler.

use std::sync::Arc;

use seedwright_fsops::{DirectoryLister, DownloadGateway, PathResolver, UploadStore};
use seedwright_jobs::{CommandBuilder, JobExecutor};
use seedwright_telemetry::Metrics;

use crate::http::router::ApiDependencies;

pub(crate) struct ApiState {
    pub(crate) resolver: PathResolver,
    pub(crate) lister: DirectoryLister,
    pub(crate) downloads: DownloadGateway,
    pub(crate) uploads: UploadStore,
    pub(crate) commands: CommandBuilder,
    pub(crate) executor: Arc<dyn JobExecutor>,
    pub(crate) telemetry: Metrics,
}

impl ApiState {
    pub(crate) fn new(dependencies: &ApiDependencies, telemetry: Metrics) -> Self {
        Self {
            resolver: PathResolver::new(dependencies.browse_root.clone()),
            lister: DirectoryLister::new(dependencies.browse_root.clone()),
            downloads: DownloadGateway::new(dependencies.output_dir.clone()),
            uploads: UploadStore::new(dependencies.output_dir.clone()),
            commands: CommandBuilder::new(
                dependencies.tool_binary.clone(),
                dependencies.output_dir.clone(),
            ),
            executor: Arc::clone(&dependencies.executor),
            telemetry,
        }
    }
}
