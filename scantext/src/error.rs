use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use thiserror::Error;

/// Service-wide error type.
///
/// Variants are grouped by who is at fault: `InvalidUpload` and
/// `PayloadTooLarge` are client input errors (400/413), everything else is a
/// processing fault and maps to 500. Display strings double as the `error`
/// field of the JSON envelope, so they are written for API consumers.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("{0}")]
    InvalidUpload(String),

    #[error("File too large. Maximum size is {}MB", max_bytes / (1024 * 1024))]
    PayloadTooLarge { max_bytes: usize },

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Image processing error: {0}")]
    Pipeline(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// HTTP status for this error. Client input faults are distinguishable
    /// from processing faults without inspecting message strings.
    pub fn status(&self) -> StatusCode {
        match self {
            ScanError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            ScanError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ScanError::Decode(_)
            | ScanError::Pipeline(_)
            | ScanError::Ocr(_)
            | ScanError::OcrUnavailable(_)
            | ScanError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
            "timestamp": Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
