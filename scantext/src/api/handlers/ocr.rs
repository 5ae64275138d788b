//! Single-image OCR endpoint.
//!
//! Pipeline per request: validate the upload, binarize the image, run
//! recognition with layout extraction, optionally persist the raw upload,
//! and assemble the response envelope.

use axum::extract::{Multipart, State};
use axum::Json;
use base64::Engine;
use chrono::Utc;

use crate::api::dto::{self, OcrResponse};
use crate::api::AppState;
use crate::error::{Result, ScanError};
use crate::upload;

/// `POST /api/ocr`
///
/// Accepts a multipart form with a single `image` file part and returns
/// recognized text with per-token bounding boxes.
#[utoipa::path(
    post,
    path = "/api/ocr",
    tag = "ocr",
    responses(
        (status = 200, description = "Recognition result", body = OcrResponse),
        (status = 400, description = "Missing file, empty filename, or disallowed extension"),
        (status = 413, description = "File exceeds the configured size limit"),
        (status = 500, description = "Decode or recognition failure"),
    )
)]
pub async fn recognize_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<OcrResponse>> {
    let mut uploaded: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ScanError::InvalidUpload(format!("Malformed multipart request: {e}")))?
    {
        if field.name() == Some("image") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ScanError::InvalidUpload(format!("Failed to read upload: {e}")))?;
            uploaded = Some((filename, bytes.to_vec()));
            break;
        }
    }

    let (filename, bytes) =
        uploaded.ok_or_else(|| ScanError::InvalidUpload("No image uploaded".to_string()))?;
    let sanitized = upload::validate(&filename, bytes.len(), &state.config.upload)?;

    let processed_png = super::preprocess_to_png(&state, bytes.clone()).await?;
    let recognition = state.ocr.recognize_with_layout(&processed_png).await?;

    if state.config.upload.persist {
        let path = upload::persist(&state.config.upload, &sanitized, &bytes).await?;
        tracing::debug!(path = %path.display(), "stored raw upload");
    }

    tracing::info!(
        filename = %sanitized,
        words = recognition.tokens.len(),
        "processed image"
    );

    let word_boxes = dto::word_boxes(&recognition.tokens);
    let preview = base64::engine::general_purpose::STANDARD.encode(&processed_png);

    Ok(Json(OcrResponse {
        success: true,
        word_count: dto::word_count(&recognition.text),
        character_count: dto::character_count(&recognition.text),
        boxes: recognition.tokens,
        word_boxes,
        processed_image: format!("data:image/png;base64,{preview}"),
        original_filename: sanitized,
        timestamp: Utc::now().to_rfc3339(),
        text: recognition.text,
    }))
}
