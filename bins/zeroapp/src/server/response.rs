//! JSON error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use zeroapp_core::error::{Error, ErrorCode, ErrorReport};

/// An error returned to the client as `{success: false, message}`, plus an
/// `error` report when it came from the build pipeline
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub report: Option<ErrorReport>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            report: None,
        }
    }

    fn with_report(mut self, err: &Error) -> Self {
        self.report = Some(err.to_report());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Map a build failure: rejected input is the client's fault, the rest is ours
    pub fn from_build_error(err: &Error) -> Self {
        let api_error = if err.code.is_client_error() {
            Self::bad_request(format!("Invalid project data: {}", err.message))
        } else {
            Self::internal(format!("Failed to generate APK: {}", err.message))
        };
        api_error.with_report(err)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = if err.code.is_client_error() {
            StatusCode::BAD_REQUEST
        } else if err.code == ErrorCode::FileNotFound {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self::new(status, err.message.clone()).with_report(&err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, message = %self.message, "Request failed");
        } else {
            tracing::debug!(status = %self.status, message = %self.message, "Request rejected");
        }
        let mut body = json!({ "success": false, "message": self.message });
        if let Some(report) = &self.report {
            body["error"] = json!(report);
        }
        (self.status, Json(body)).into_response()
    }
}
