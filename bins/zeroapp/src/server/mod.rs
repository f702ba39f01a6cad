//! HTTP API
//!
//! JSON endpoints for generating APKs and uploading assets, artifact and
//! source downloads, and the web editor's static files as a fallback.

mod api;
mod files;
mod response;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use zeroapp_android::ApkBuilder;
use zeroapp_core::config::{ConfigSchema, ServerConfig};

const MB: usize = 1024 * 1024;

/// Multipart framing allowance on top of the upload limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared server state
pub struct AppState {
    pub builder: ApkBuilder,
    pub static_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub upload_limit: usize,
    pub body_limit: usize,
}

impl AppState {
    pub fn new(config: &ConfigSchema) -> Result<Arc<Self>> {
        let builder = ApkBuilder::new(config)?;
        Ok(Self::with_builder(config, builder))
    }

    pub fn with_builder(config: &ConfigSchema, builder: ApkBuilder) -> Arc<Self> {
        Arc::new(Self {
            builder,
            static_dir: PathBuf::from(&config.server.static_dir),
            upload_dir: config.storage.upload_dir(),
            upload_limit: config.server.upload_limit_mb * MB,
            body_limit: config.server.body_limit_mb * MB,
        })
    }

    /// Directories the server writes to
    pub fn storage_dirs(&self) -> Vec<PathBuf> {
        vec![
            self.builder.work_dir().to_path_buf(),
            self.builder.output_dir().to_path_buf(),
            self.upload_dir.clone(),
        ]
    }
}

/// Build the router
pub fn router(state: Arc<AppState>) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.upload_limit + MULTIPART_OVERHEAD);

    Router::new()
        .route(
            "/api/generate-apk",
            post(api::generate_apk).layer(DefaultBodyLimit::max(state.body_limit)),
        )
        .route(
            "/api/upload-keystore",
            post(api::upload_keystore).layer(upload_limit.clone()),
        )
        .route("/api/upload-icon", post(api::upload_icon).layer(upload_limit))
        .route("/api/health", get(api::health))
        .route("/api/metrics", get(api::metrics_snapshot))
        .route("/download/{filename}", get(files::download_apk))
        .route("/download-source", get(files::download_source))
        .fallback_service(ServeDir::new(&state.static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C or SIGTERM
pub async fn serve(state: Arc<AppState>, config: &ServerConfig) -> Result<()> {
    for dir in state.storage_dirs() {
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;

    tracing::info!(
        address = %listener.local_addr()?,
        static_dir = %state.static_dir.display(),
        output_dir = %state.builder.output_dir().display(),
        session_id = %zeroapp_telemetry::session_id(),
        "ZeroApp Builder listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;
    use zeroapp_android::KeystoreGenerator;

    struct Fixture {
        _dir: TempDir,
        app: Router,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("web")).unwrap();
        std::fs::write(root.join("web/index.html"), "<h1>ZeroApp</h1>").unwrap();

        let mut config = ConfigSchema::default();
        config.server.static_dir = root.join("web").to_string_lossy().into_owned();
        config.storage.work_dir = root.join("work").to_string_lossy().into_owned();
        config.storage.upload_dir = root.join("uploads").to_string_lossy().into_owned();

        let builder = ApkBuilder::new(&config)
            .unwrap()
            .with_keystore_generator(
                KeystoreGenerator::new(config.keystore.clone()).with_program("zeroapp-no-such-keytool"),
            );
        let app = router(AppState::with_builder(&config, builder));
        Fixture { _dir: dir, app }
    }

    fn project() -> Value {
        json!({
            "name": "Test App",
            "package": "com.example.test",
            "version": "1.0.0",
            "screens": {
                "mainScreen": {
                    "name": "Home",
                    "components": [{ "type": "text", "properties": { "content": "Hi" } }]
                }
            }
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, _, body) = send(app, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn multipart(field: &str, file_name: &str, data: &str) -> Request<Body> {
        let body = format!(
            "--XBOUNDARYX\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n{}\r\n--XBOUNDARYX--\r\n",
            field, file_name, data
        );
        Request::post(format!("/api/upload-{}", if field == "icon" { "icon" } else { "keystore" }))
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARYX")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_generate_rejects_missing_package() {
        let f = fixture();
        let mut p = project();
        p.as_object_mut().unwrap().remove("package");

        let (status, body) = post_json(&f.app, "/api/generate-apk", json!({ "project": p })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid project data"));
    }

    #[tokio::test]
    async fn test_generate_rejects_missing_project() {
        let f = fixture();
        let (status, body) = post_json(&f.app, "/api/generate-apk", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Invalid project data. Project name and package are required."
        );
    }

    #[tokio::test]
    async fn test_generate_and_download() {
        let f = fixture();
        let (status, body) = post_json(
            &f.app,
            "/api/generate-apk",
            json!({ "project": project(), "keystorePassword": "hunter22" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "APK generated successfully");
        assert_eq!(body["apkFilename"], "Test_App-1.0.0.apk");
        assert_eq!(body["keystore"], "simulated");

        let apk_path = body["apkPath"].as_str().unwrap();
        assert!(apk_path.starts_with("/download/app-"));

        let request = Request::get(format!("{}?name=Test_App-1.0.0.apk", apk_path))
            .body(Body::empty())
            .unwrap();
        let (status, headers, bytes) = send(&f.app, request).await;
        assert_eq!(status, StatusCode::OK);
        let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert_eq!(disposition, "attachment; filename=\"Test_App-1.0.0.apk\"");
        assert_eq!(&bytes[..2], b"PK");
    }

    #[tokio::test]
    async fn test_download_unknown_file() {
        let f = fixture();
        for uri in ["/download/app-0.apk", "/download/..%2F..%2Fetc%2Fpasswd"] {
            let request = Request::get(uri).body(Body::empty()).unwrap();
            let (status, _, body) = send(&f.app, request).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
            let body: Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(body["message"], "APK file not found");
        }
    }

    #[tokio::test]
    async fn test_upload_keystore_then_build_with_it() {
        let f = fixture();
        let (status, _, body) = send(&f.app, multipart("keystore", "my release.jks", "JKS-DATA")).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Keystore uploaded successfully");
        let token = body["keystorePath"].as_str().unwrap().to_string();
        assert!(token.ends_with("-my_release.jks"));

        let (status, body) = post_json(
            &f.app,
            "/api/generate-apk",
            json!({ "project": project(), "keystorePath": token }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["keystore"], "provided");
    }

    #[tokio::test]
    async fn test_unknown_keystore_token() {
        let f = fixture();
        let (status, _) = post_json(
            &f.app,
            "/api/generate-apk",
            json!({ "project": project(), "keystorePath": "../../etc/passwd" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_icon() {
        let f = fixture();
        let (status, _, body) = send(&f.app, multipart("icon", "logo.png", "PNG")).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Icon uploaded successfully");
        assert!(body["iconPath"].as_str().unwrap().ends_with("-logo.png"));
    }

    #[tokio::test]
    async fn test_upload_without_file() {
        let f = fixture();
        let (status, _, body) = send(&f.app, multipart("other", "x.png", "PNG")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "No keystore file uploaded");
    }

    #[tokio::test]
    async fn test_health_and_metrics() {
        let f = fixture();
        let (status, _, body) = send(&f.app, Request::get("/api/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert!(body["checks"].as_array().unwrap().len() >= 3);

        let (status, _, body) = send(&f.app, Request::get("/api/metrics").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert!(body["counters"].is_object());
    }

    #[tokio::test]
    async fn test_static_fallback_and_source_download() {
        let f = fixture();
        let (status, _, body) = send(&f.app, Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>ZeroApp</h1>");

        let (status, headers, body) =
            send(&f.app, Request::get("/download-source").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"zeroapp-builder-source.zip\""
        );
        assert_eq!(&body[..2], b"PK");
    }
}
