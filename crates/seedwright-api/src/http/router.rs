//! Route table, middleware stack and listener.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, header::CONTENT_TYPE},
    middleware,
    response::Response,
    routing::{get, post},
};
use seedwright_config::ServerConfig;
use seedwright_jobs::{JobExecutor, ProcessJobRunner};
use seedwright_telemetry::{
    Metrics, RequestScope, assign_request_id_layer, build_sha, echo_request_id_layer,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{Span, field, info};

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::constants::HEADER_REQUEST_ID;
use crate::http::create::create_torrent;
use crate::http::download::download_artifact;
use crate::http::files::list_files;
use crate::http::health::{health, metrics};
use crate::http::telemetry::track_request;
use crate::http::upload::upload_sidecar;
use crate::state::ApiState;

/// Collaborators the API needs beyond telemetry.
pub struct ApiDependencies {
    /// Root of the directory browser.
    pub browse_root: PathBuf,
    /// Directory that receives metafiles and uploads.
    pub output_dir: PathBuf,
    /// External torrent-creation tool.
    pub tool_binary: PathBuf,
    /// Optional directory of static frontend assets.
    pub static_dir: Option<PathBuf>,
    /// Runs authoring jobs.
    pub executor: Arc<dyn JobExecutor>,
}

impl ApiDependencies {
    /// Dependencies backed by a real process runner and no static assets.
    #[must_use]
    pub fn new(browse_root: PathBuf, output_dir: PathBuf, tool_binary: PathBuf) -> Self {
        Self {
            browse_root,
            output_dir,
            tool_binary,
            static_dir: None,
            executor: Arc::new(ProcessJobRunner::new()),
        }
    }

    /// Dependencies described by a prepared server configuration.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.browse_root.clone(),
            config.output_dir.clone(),
            config.tool_binary.clone(),
        )
        .with_static_dir(config.static_dir.clone())
    }

    /// Replace the job executor.
    #[must_use]
    pub fn with_executor(mut self, executor: Arc<dyn JobExecutor>) -> Self {
        self.executor = executor;
        self
    }

    /// Serve static assets from `static_dir` for unmatched routes.
    #[must_use]
    pub fn with_static_dir(mut self, static_dir: Option<PathBuf>) -> Self {
        self.static_dir = static_dir;
        self
    }
}

/// Axum router wrapper that hosts the Seedwright API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Construct the API with its middleware stack and routes.
    #[must_use]
    pub fn new(dependencies: &ApiDependencies, telemetry: Metrics) -> Self {
        let state = Arc::new(ApiState::new(dependencies, telemetry.clone()));
        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE]);
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(request_span)
            .on_response(record_response);
        let layered = ServiceBuilder::new()
            .layer(assign_request_id_layer())
            .layer(echo_request_id_layer())
            .layer(trace_layer)
            .layer(middleware::from_fn_with_state(telemetry, track_request));

        let router = Self::routes();
        let router = match &dependencies.static_dir {
            Some(dir) => router.fallback_service(ServeDir::new(dir)),
            None => router,
        };
        let router = router
            .layer(cors_layer)
            .route_layer(layered)
            .with_state(state);

        Self { router }
    }

    fn routes() -> Router<Arc<ApiState>> {
        Router::new()
            .route("/health", get(health))
            .route("/metrics", get(metrics))
            .route("/api/files", get(list_files))
            .route("/api/create", post(create_torrent))
            .route("/api/download", get(download_artifact))
            .route("/api/upload", post(upload_sidecar))
    }

    /// Consume the server and return the fully layered router.
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Listen on `addr` and serve until the accept loop fails.
    ///
    /// # Errors
    ///
    /// [`ApiServerError::Listen`] when the socket cannot be bound, and
    /// [`ApiServerError::Stopped`] when serving ends with an error.
    pub async fn serve(self, addr: SocketAddr) -> ApiServerResult<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Listen { addr, source })?;
        info!(%addr, "starting api");
        axum::serve(listener, self.router.into_make_service())
            .await
            .map_err(|source| ApiServerError::Stopped { source })
    }
}

/// Root span for one HTTP exchange; `status_code` and `latency_ms` are filled on response.
fn request_span(request: &Request<Body>) -> Span {
    let span = tracing::info_span!(
        "http",
        method = %request.method(),
        route = field::Empty,
        request_id = field::Empty,
        build_sha = build_sha(),
        status_code = field::Empty,
        latency_ms = field::Empty
    );
    let request_id = request
        .headers()
        .get(HEADER_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    RequestScope::new(request_id, request.uri().path()).record_on(&span);
    span
}

fn record_response(response: &Response, latency: Duration, span: &Span) {
    span.record("status_code", response.status().as_u16());
    span.record(
        "latency_ms",
        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::StubExecutor;
    use anyhow::Result;
    use axum::http::StatusCode;
    use seedwright_test_support::fixtures::TempTree;
    use tower::ServiceExt;

    fn dependencies(tree: &TempTree) -> ApiDependencies {
        ApiDependencies::new(tree.root().into(), tree.root().into(), "mktorrent".into())
            .with_executor(StubExecutor::exiting(0))
    }

    #[tokio::test]
    async fn unknown_route_is_not_found_without_static_dir() -> Result<()> {
        let tree = TempTree::new()?;
        let router = ApiServer::new(&dependencies(&tree), Metrics::new()?).into_router();
        let response = router
            .oneshot(Request::builder().uri("/index.html").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn static_dir_serves_frontend_assets() -> Result<()> {
        let tree = TempTree::new()?;
        let public = tree.dir("public")?;
        tree.file("public/index.html", b"<html>seedwright</html>")?;
        let deps = dependencies(&tree).with_static_dir(Some(public));
        let router = ApiServer::new(&deps, Metrics::new()?).into_router();

        let response = router
            .oneshot(Request::builder().uri("/index.html").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        assert_eq!(body.as_ref(), b"<html>seedwright</html>");
        Ok(())
    }

    #[tokio::test]
    async fn responses_carry_request_id() -> Result<()> {
        let tree = TempTree::new()?;
        let router = ApiServer::new(&dependencies(&tree), Metrics::new()?).into_router();
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty())?)
            .await?;
        assert!(response.headers().contains_key(HEADER_REQUEST_ID));
        Ok(())
    }

    #[tokio::test]
    async fn caller_request_id_is_echoed_unchanged() -> Result<()> {
        let tree = TempTree::new()?;
        let router = ApiServer::new(&dependencies(&tree), Metrics::new()?).into_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/files")
                    .header(HEADER_REQUEST_ID, "trace-me")
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(
            response
                .headers()
                .get(HEADER_REQUEST_ID)
                .map(|value| value.as_bytes()),
            Some(b"trace-me".as_slice())
        );
        Ok(())
    }

    #[tokio::test]
    async fn serve_reports_bind_failures() -> Result<()> {
        let tree = TempTree::new()?;
        let occupied = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = occupied.local_addr()?;
        let server = ApiServer::new(&dependencies(&tree), Metrics::new()?);
        let err = server
            .serve(addr)
            .await
            .err()
            .ok_or_else(|| anyhow::anyhow!("expected bind failure"))?;
        assert!(matches!(err, ApiServerError::Listen { .. }));
        Ok(())
    }
}
