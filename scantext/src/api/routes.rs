use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::{handlers, openapi, AppState};

/// Slack on top of the per-file limit for multipart framing and extra fields.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // The body limit sits above max_file_size so the handler's explicit size
    // check fires first and produces the enveloped 413.
    let body_limit = state.config.upload.max_file_size + MULTIPART_OVERHEAD;

    let api = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ocr", post(handlers::ocr::recognize_image))
        .route("/ocr-batch", post(handlers::batch::recognize_batch))
        .route("/openapi.json", get(openapi::openapi_json))
        .merge(openapi::redoc_router());

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
