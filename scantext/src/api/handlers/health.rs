use axum::Json;
use chrono::Utc;

use crate::api::dto::HealthResponse;

/// `GET /api/health`
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthResponse),
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "OCR API".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
