//! Batch OCR endpoint.
//!
//! Each file is processed independently through the same preprocessing and
//! recognition stages as the single endpoint, text-only. One file's failure
//! is recorded in its result entry and never aborts the batch.

use axum::extract::{Multipart, State};
use axum::Json;
use chrono::Utc;

use crate::api::dto::{self, BatchResponse, BatchResult};
use crate::api::AppState;
use crate::error::{Result, ScanError};
use crate::upload;

/// `POST /api/ocr-batch`
///
/// Accepts a multipart form with repeated `images` file parts. Files with
/// disallowed extensions are skipped silently; all other failures show up as
/// `failed` result entries.
#[utoipa::path(
    post,
    path = "/api/ocr-batch",
    tag = "ocr",
    responses(
        (status = 200, description = "Per-file results with batch accounting", body = BatchResponse),
        (status = 400, description = "No files uploaded"),
        (status = 500, description = "Unexpected failure outside per-file processing"),
    )
)]
pub async fn recognize_batch(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BatchResponse>> {
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ScanError::InvalidUpload(format!("Malformed multipart request: {e}")))?
    {
        if field.name() == Some("images") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ScanError::InvalidUpload(format!("Failed to read upload: {e}")))?;
            files.push((filename, bytes.to_vec()));
        }
    }

    if files.is_empty() {
        return Err(ScanError::InvalidUpload("No images uploaded".to_string()));
    }

    let total_files = files.len();
    let mut results = Vec::new();

    for (filename, bytes) in files {
        // Disallowed or nameless files are skipped, not failed
        if filename.is_empty()
            || !upload::is_allowed(&filename, &state.config.upload.allowed_extensions)
        {
            tracing::debug!(filename = %filename, "skipping disallowed file in batch");
            continue;
        }

        match process_one(&state, bytes).await {
            Ok((text, word_count)) => results.push(BatchResult::Success {
                filename,
                text,
                word_count,
            }),
            Err(e) => {
                tracing::warn!(filename = %filename, error = %e, "batch file failed");
                results.push(BatchResult::Failed {
                    filename,
                    error: e.to_string(),
                });
            }
        }
    }

    let processed = results.iter().filter(|r| r.is_success()).count();
    let failed = results.len() - processed;

    Ok(Json(BatchResponse {
        success: true,
        total_files,
        processed,
        failed,
        results,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

async fn process_one(state: &AppState, bytes: Vec<u8>) -> Result<(String, usize)> {
    // An oversized file inside a batch becomes a failed entry rather than
    // rejecting the whole request.
    if bytes.len() > state.config.upload.max_file_size {
        return Err(ScanError::PayloadTooLarge {
            max_bytes: state.config.upload.max_file_size,
        });
    }

    let processed_png = super::preprocess_to_png(state, bytes).await?;
    let text = state.ocr.recognize(&processed_png).await?;
    let word_count = dto::word_count(&text);
    Ok((text, word_count))
}
