use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use crate::ocr;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Scantext API",
        version = "1.0.0",
        description = "Image OCR service. Upload an image, get back recognized text with per-word bounding boxes and confidence scores.",
    ),
    paths(
        handlers::health::health_check,
        handlers::ocr::recognize_image,
        handlers::batch::recognize_batch,
    ),
    components(schemas(
        dto::HealthResponse,
        dto::OcrResponse,
        dto::WordBox,
        dto::BatchResponse,
        dto::BatchResult,
        ocr::TokenRecord,
        ocr::BoundingBox,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "ocr", description = "Image upload and text recognition"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
