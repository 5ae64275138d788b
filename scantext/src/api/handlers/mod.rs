pub mod batch;
pub mod health;
pub mod ocr;

use crate::api::state::AppState;
use crate::error::{Result, ScanError};
use crate::pipeline;

/// Run the preprocessing pipeline on the blocking pool and return the
/// binarized image re-encoded as PNG, ready for the OCR engine.
pub(super) async fn preprocess_to_png(state: &AppState, bytes: Vec<u8>) -> Result<Vec<u8>> {
    let profile = state.config.pipeline.profile;
    let max_dimension = state.config.pipeline.max_dimension;

    tokio::task::spawn_blocking(move || {
        let gray = pipeline::preprocess(&bytes, profile, max_dimension)?;
        pipeline::encode_png(&gray)
    })
    .await
    .map_err(|e| ScanError::Pipeline(format!("Preprocessing task panicked: {e}")))?
}
