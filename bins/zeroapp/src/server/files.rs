//! Artifact and source downloads

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use zeroapp_android::package::package_source;
use zeroapp_core::validation::{sanitize_file_name, validate_file_name};

use super::response::ApiError;
use super::AppState;

const APK_CONTENT_TYPE: &str = "application/vnd.android.package-archive";
const SOURCE_ARCHIVE_NAME: &str = "zeroapp-builder-source.zip";

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    name: Option<String>,
}

fn attachment(name: &str) -> String {
    format!("attachment; filename=\"{}\"", name)
}

pub async fn download_apk(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let not_found = || ApiError::not_found("APK file not found");

    if !validate_file_name(&filename).is_valid() {
        tracing::warn!(filename = %filename, "Rejected download name");
        return Err(not_found());
    }

    let path = state.builder.output_dir().join(&filename);
    let file = tokio::fs::File::open(&path).await.map_err(|_| not_found())?;
    let length = file.metadata().await.map(|m| m.len()).ok();

    let name = query
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .map(sanitize_file_name)
        .unwrap_or_else(|| "app.apk".to_string());

    tracing::info!(filename = %filename, name = %name, "Sending APK");

    let mut response = (
        [
            (header::CONTENT_TYPE, APK_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, attachment(&name)),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response();
    if let Some(length) = length {
        response.headers_mut().insert(header::CONTENT_LENGTH, length.into());
    }
    Ok(response)
}

pub async fn download_source(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let failed = |e: &dyn std::fmt::Display| {
        tracing::error!(error = %e, "Source archive failed");
        ApiError::internal("Error generating source code download")
    };

    let static_dir = state.static_dir.clone();
    let dest = state
        .builder
        .work_dir()
        .join(format!(".zeroapp-source-{}.zip", uuid::Uuid::new_v4().simple()));

    let archive = dest.clone();
    let summary = tokio::task::spawn_blocking(move || {
        if let Some(parent) = archive.parent() {
            std::fs::create_dir_all(parent)?;
        }
        package_source(&static_dir, &archive)
    })
    .await
    .map_err(|e| failed(&e))?
    .map_err(|e| failed(&e))?;

    let bytes = tokio::fs::read(&dest).await.map_err(|e| failed(&e));
    if let Err(e) = tokio::fs::remove_file(&dest).await {
        tracing::warn!(path = %dest.display(), error = %e, "Failed to remove source archive");
    }
    let bytes = bytes?;

    tracing::info!(entries = summary.entries, size_bytes = summary.size_bytes, "Sending source archive");

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, attachment(SOURCE_ARCHIVE_NAME)),
        ],
        bytes,
    )
        .into_response())
}
