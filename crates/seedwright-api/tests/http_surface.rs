use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use seedwright_api::{ApiDependencies, ApiServer};
use seedwright_jobs::ProcessJobRunner;
use seedwright_telemetry::Metrics;
use seedwright_test_support::fixtures::TempTree;
use serde_json::{Value, json};
use tower::ServiceExt;

struct Harness {
    tree: TempTree,
    router: Router,
    telemetry: Metrics,
}

impl Harness {
    fn new() -> Result<Self> {
        let tree = TempTree::new()?;
        let data = tree.dir("data")?;
        let output = tree.dir("output")?;
        let deps = ApiDependencies::new(data, output, tree.root().join("no-such-tool"));
        Self::with_dependencies(tree, &deps)
    }

    fn with_dependencies(tree: TempTree, deps: &ApiDependencies) -> Result<Self> {
        let telemetry = Metrics::new()?;
        let router = ApiServer::new(deps, telemetry.clone()).into_router();
        Ok(Self {
            tree,
            router,
            telemetry,
        })
    }

    async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Vec<u8>)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, body.to_vec()))
    }

    async fn get_json(&self, uri: &str) -> Result<(StatusCode, Value)> {
        let (status, body) = self
            .send(Request::builder().uri(uri).body(Body::empty())?)
            .await?;
        Ok((status, serde_json::from_slice(&body)?))
    }

    async fn post_json(&self, uri: &str, payload: &Value) -> Result<(StatusCode, Value)> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(payload)?))?;
        let (status, body) = self.send(request).await?;
        Ok((status, serde_json::from_slice(&body)?))
    }
}

fn encode_query(value: &str) -> String {
    value
        .bytes()
        .map(|byte| match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (byte as char).to_string()
            }
            other => format!("%{other:02X}"),
        })
        .collect()
}

#[tokio::test]
async fn browse_lists_root_then_children() -> Result<()> {
    let harness = Harness::new()?;
    harness.tree.file("data/zeta.bin", &[1; 10])?;
    harness.tree.dir("data/Alpha")?;
    harness.tree.dir("data/beta")?;

    let (status, root) = harness.get_json("/api/files").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(root["parentPath"], Value::Null);
    let names: Vec<_> = root["files"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|entry| entry["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Alpha", "beta", "zeta.bin"]);
    assert_eq!(root["files"][2]["size"], json!("10 B"));

    let beta = harness.tree.root().join("data/beta");
    let uri = format!("/api/files?path={}", encode_query(&beta.to_string_lossy()));
    let (status, child) = harness.get_json(&uri).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        child["parentPath"],
        json!(harness.tree.root().join("data").to_string_lossy())
    );
    Ok(())
}

#[tokio::test]
async fn browse_missing_path_is_problem_document() -> Result<()> {
    let harness = Harness::new()?;
    let missing = harness.tree.root().join("data/absent");
    let uri = format!("/api/files?path={}", encode_query(&missing.to_string_lossy()));
    let (status, body) = harness.get_json(&uri).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], json!(404));
    assert_eq!(body["type"], json!("https://seedwright.dev/problems/not-found"));
    Ok(())
}

#[tokio::test]
async fn create_rejects_invalid_fields_with_pointers() -> Result<()> {
    let harness = Harness::new()?;
    let (status, body) = harness
        .post_json(
            "/api/create",
            &json!({"sourcePath": "/data/a", "outputName": "nested/name", "pieceSize": "huge"}),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let pointers: Vec<_> = body["invalid_params"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|param| param["pointer"].as_str())
        .collect();
    assert_eq!(pointers, vec!["/announceUrl", "/outputName", "/pieceSize"]);
    Ok(())
}

#[tokio::test]
async fn create_with_malformed_json_is_bad_request() -> Result<()> {
    let harness = Harness::new()?;
    let request = Request::builder()
        .method("POST")
        .uri("/api/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;
    let (status, _) = harness.send(request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
#[serial_test::serial]
async fn create_with_missing_tool_reports_launch_failure() -> Result<()> {
    let harness = Harness::new()?;
    let (status, body) = harness
        .post_json(
            "/api/create",
            &json!({"sourcePath": "/data/a", "announceUrl": "https://t", "outputName": "a"}),
        )
        .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["code"], Value::Null);
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .starts_with("failed to start external tool: ")
    );
    assert!(body["jobId"].is_string());
    assert!(harness.telemetry.render()?.contains("launch_failed"));
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
#[serial_test::serial]
async fn create_then_download_round_trip() -> Result<()> {
    let tree = TempTree::new()?;
    let tool = seedwright_test_support::tools::fake_mktorrent(&tree.dir("bin")?)?;
    let data = tree.dir("data")?;
    let output = tree.dir("output")?;
    tree.file("data/show/episode.mkv", b"frames")?;
    let deps = ApiDependencies::new(data.clone(), output.clone(), tool)
        .with_executor(Arc::new(ProcessJobRunner::new()));
    let harness = Harness::with_dependencies(tree, &deps)?;

    let (status, body) = harness
        .post_json(
            "/api/create",
            &json!({
                "sourcePath": data.join("show").to_string_lossy(),
                "announceUrl": "https://tracker.example/announce",
                "outputName": "show",
                "pieceSize": 19
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], json!(true));
    assert_eq!(
        body["outputPath"],
        json!(output.join("show.torrent").to_string_lossy())
    );

    let response = harness
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/download?file=show.torrent")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("application/x-bittorrent")
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(bytes.as_ref(), b"d8:announce0:e");
    Ok(())
}

#[tokio::test]
async fn download_requires_file_parameter() -> Result<()> {
    let harness = Harness::new()?;
    let (status, body) = harness.get_json("/api/download").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], json!("missing file parameter"));

    let (status, _) = harness.get_json("/api/download?file=absent.torrent").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn upload_stores_sidecar_in_output_dir() -> Result<()> {
    let harness = Harness::new()?;
    let boundary = "seedwright-boundary";
    let payload = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"nfo\"; filename=\"../release.nfo\"\r\n\
         Content-Type: text/plain\r\n\r\n\
         release notes\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(payload))?;
    let (status, body) = harness.send(request).await?;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body)?;
    let stored = harness.tree.root().join("output/release.nfo");
    assert_eq!(body["path"], json!(stored.to_string_lossy()));
    assert_eq!(body["message"], json!("NFO uploaded successfully"));
    assert_eq!(tokio::fs::read(&stored).await?, b"release notes");
    Ok(())
}

#[tokio::test]
async fn upload_without_nfo_field_is_bad_request() -> Result<()> {
    let harness = Harness::new()?;
    let boundary = "b";
    let payload = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"other\"\r\n\r\n\
         value\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(payload))?;
    let (status, body) = harness.send(request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body)?;
    assert_eq!(body["detail"], json!("no file uploaded"));
    Ok(())
}

#[tokio::test]
async fn cors_allows_any_origin() -> Result<()> {
    let harness = Harness::new()?;
    let response = harness
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://frontend.local")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
    Ok(())
}

#[tokio::test]
async fn metrics_count_routes_after_traffic() -> Result<()> {
    let harness = Harness::new()?;
    let (status, _) = harness.get_json("/health").await?;
    assert_eq!(status, StatusCode::OK);
    let (status, text) = harness
        .send(Request::builder().uri("/metrics").body(Body::empty())?)
        .await?;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(text)?;
    assert!(text.contains("route=\"/health\""));
    Ok(())
}
