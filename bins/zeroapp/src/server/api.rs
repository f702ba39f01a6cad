//! JSON API handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use zeroapp_android::{BuildOutcome, BuildRequest, Project};
use zeroapp_core::health::HealthChecker;
use zeroapp_core::validation::{sanitize_file_name, validate_file_name};
use zeroapp_telemetry::{metrics, names};

use super::response::ApiError;
use super::AppState;

/// Body of `POST /api/generate-apk`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    project: Option<Value>,
    #[serde(default)]
    keystore_password: Option<String>,
    /// Stored name returned by `/api/upload-keystore`
    #[serde(default)]
    keystore_path: Option<String>,
}

pub async fn generate_apk(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        ApiError::new(rejection.status(), format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let project = parse_project(body.project)?;

    let mut request = BuildRequest::new(project);
    if let Some(password) = body.keystore_password.filter(|p| !p.is_empty()) {
        request = request.with_password(password);
    }
    if let Some(token) = body.keystore_path.filter(|t| !t.is_empty()) {
        request = request.with_keystore(resolve_upload(&state, &token)?);
    }

    metrics().increment(names::BUILDS_STARTED);
    let worker = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || worker.builder.build(&request))
        .await
        .map_err(|e| ApiError::internal(format!("Failed to generate APK: {}", e)))?;

    match result {
        Ok(outcome) => {
            record_success(&outcome);
            Ok(Json(json!({
                "success": true,
                "message": "APK generated successfully",
                "apkPath": format!("/download/{}", outcome.apk_filename),
                "apkFilename": outcome.download_name,
                "keystore": outcome.keystore.kind(),
                "warnings": outcome.warnings,
            })))
        }
        Err(err) => {
            metrics().increment(names::BUILDS_FAILED);
            Err(ApiError::from_build_error(&err))
        }
    }
}

fn parse_project(value: Option<Value>) -> Result<Project, ApiError> {
    let missing = || ApiError::bad_request("Invalid project data. Project name and package are required.");
    let value = value.filter(Value::is_object).ok_or_else(missing)?;
    serde_json::from_value(value)
        .map_err(|e| ApiError::bad_request(format!("Invalid project data: {}", e)))
}

/// Map an upload token back to a file inside the upload directory
fn resolve_upload(state: &AppState, token: &str) -> Result<PathBuf, ApiError> {
    if !validate_file_name(token).is_valid() {
        return Err(ApiError::bad_request("Invalid keystore path"));
    }
    let path = state.upload_dir.join(token);
    if !path.is_file() {
        return Err(ApiError::bad_request("Uploaded keystore not found"));
    }
    Ok(path)
}

fn record_success(outcome: &BuildOutcome) {
    let registry = metrics();
    registry.increment(names::BUILDS_SUCCEEDED);
    if outcome.keystore.is_simulated() {
        registry.increment(names::KEYSTORE_SIMULATED);
    }
    registry.record_duration(names::RENDER_DURATION_MS, outcome.render_duration);
    registry.record_duration(names::BUILD_DURATION_MS, outcome.duration);
}

pub async fn upload_keystore(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let stored = store_upload(&state, multipart, "keystore").await?;
    Ok(Json(json!({
        "success": true,
        "message": "Keystore uploaded successfully",
        "keystorePath": stored,
    })))
}

pub async fn upload_icon(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let stored = store_upload(&state, multipart, "icon").await?;
    Ok(Json(json!({
        "success": true,
        "message": "Icon uploaded successfully",
        "iconPath": stored,
    })))
}

/// Save the named multipart field as `<millis>-<sanitized name>`; returns the stored name
async fn store_upload(state: &AppState, mut multipart: Multipart, field_name: &str) -> Result<String, ApiError> {
    let multipart_error =
        |e: axum::extract::multipart::MultipartError| ApiError::new(e.status(), e.body_text());

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(field_name) {
            continue;
        }
        let original = field.file_name().unwrap_or(field_name).to_string();
        let data = field.bytes().await.map_err(multipart_error)?;
        if data.len() > state.upload_limit {
            return Err(ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, "File too large"));
        }

        let stored = format!(
            "{}-{}",
            chrono::Utc::now().timestamp_millis(),
            sanitize_file_name(&original)
        );
        tokio::fs::create_dir_all(&state.upload_dir)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to store upload: {}", e)))?;
        tokio::fs::write(state.upload_dir.join(&stored), &data)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to store upload: {}", e)))?;

        tracing::info!(field = field_name, stored = %stored, bytes = data.len(), "Stored upload");
        return Ok(stored);
    }

    Err(ApiError::bad_request(format!("No {} file uploaded", field_name)))
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let dirs = state.storage_dirs();
    let report = tokio::task::spawn_blocking(move || HealthChecker::new().with_builder_checks(&dirs).run()).await;

    match report {
        Ok(report) => {
            let status = if report.status.is_operational() {
                StatusCode::OK
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };
            (status, Json(json!(report))).into_response()
        }
        Err(e) => ApiError::internal(format!("Health check failed: {}", e)).into_response(),
    }
}

pub async fn metrics_snapshot() -> Json<Value> {
    Json(metrics().export_json())
}
