use std::sync::Arc;
use std::time::Duration;

use leptess::{LepTess, Variable};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::OcrConfig;
use crate::error::{Result, ScanError};

use super::tsv::{self, TokenRecord};

/// Fixed page segmentation mode: fully automatic page layout analysis.
const PAGE_SEG_MODE: &str = "3";

/// Recognition output: the full text plus the filtered token stream.
#[derive(Debug, Clone)]
pub struct Recognition {
    /// Trimmed recognized text.
    pub text: String,
    /// Token records with confidence > 60 and non-empty text, in reading
    /// order, with coordinates relative to the processed image.
    pub tokens: Vec<TokenRecord>,
}

enum OcrBackend {
    Tesseract { engine: Arc<Mutex<LepTess>> },
    Unavailable { reason: String },
}

/// Adapter over the Tesseract engine.
///
/// The engine handle is shared behind a mutex and driven from the blocking
/// pool; construction degrades gracefully to an `Unavailable` backend when no
/// Tesseract installation is found, so the service can still start and report
/// the failure per request.
pub struct OcrProvider {
    backend: OcrBackend,
    config: OcrConfig,
}

fn create_tesseract(languages: &str) -> std::result::Result<LepTess, String> {
    let mut engine = LepTess::new(None, languages).map_err(|e| e.to_string())?;
    engine
        .set_variable(Variable::TesseditPagesegMode, PAGE_SEG_MODE)
        .map_err(|e| e.to_string())?;
    Ok(engine)
}

impl OcrProvider {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let backend = match create_tesseract(&config.languages) {
            Ok(engine) => {
                info!(languages = %config.languages, "Tesseract OCR initialized");
                OcrBackend::Tesseract {
                    engine: Arc::new(Mutex::new(engine)),
                }
            }
            Err(e) => {
                let reason = format!("Tesseract not available: {e}");
                warn!("{}", reason);
                OcrBackend::Unavailable { reason }
            }
        };

        Ok(Self {
            backend,
            config: config.clone(),
        })
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }

    /// Text-only recognition, used by the batch endpoint.
    pub async fn recognize(&self, image_bytes: &[u8]) -> Result<String> {
        let recognition = self.run(image_bytes.to_vec(), false).await?;
        Ok(recognition.text)
    }

    /// Text plus per-token layout extraction, used by the single endpoint.
    pub async fn recognize_with_layout(&self, image_bytes: &[u8]) -> Result<Recognition> {
        self.run(image_bytes.to_vec(), true).await
    }

    async fn run(&self, bytes: Vec<u8>, with_layout: bool) -> Result<Recognition> {
        let timeout = Duration::from_secs(self.config.timeout_secs);
        match tokio::time::timeout(timeout, self.run_inner(bytes, with_layout)).await {
            Ok(result) => result,
            Err(_) => Err(ScanError::Ocr(format!(
                "OCR operation timed out after {} seconds",
                self.config.timeout_secs
            ))),
        }
    }

    async fn run_inner(&self, bytes: Vec<u8>, with_layout: bool) -> Result<Recognition> {
        match &self.backend {
            OcrBackend::Tesseract { engine } => {
                let engine = Arc::clone(engine);

                tokio::task::spawn_blocking(move || {
                    let mut lt = engine.blocking_lock();
                    lt.set_image_from_mem(&bytes)
                        .map_err(|e| ScanError::Ocr(format!("Failed to set image: {e}")))?;

                    let text = lt
                        .get_utf8_text()
                        .map_err(|e| ScanError::Ocr(format!("Failed to extract text: {e}")))?;

                    let tokens = if with_layout {
                        let raw = lt.get_tsv_text(0).map_err(|e| {
                            ScanError::Ocr(format!("Failed to extract layout: {e}"))
                        })?;
                        tsv::parse_filtered(&raw)
                    } else {
                        Vec::new()
                    };

                    Ok(Recognition {
                        text: text.trim().to_string(),
                        tokens,
                    })
                })
                .await
                .map_err(|e| ScanError::Ocr(format!("OCR task panicked: {e}")))?
            }
            OcrBackend::Unavailable { reason } => {
                Err(ScanError::OcrUnavailable(reason.clone()))
            }
        }
    }
}

impl Clone for OcrProvider {
    fn clone(&self) -> Self {
        let backend = match &self.backend {
            OcrBackend::Tesseract { engine } => OcrBackend::Tesseract {
                engine: Arc::clone(engine),
            },
            OcrBackend::Unavailable { reason } => OcrBackend::Unavailable {
                reason: reason.clone(),
            },
        };
        Self {
            backend,
            config: self.config.clone(),
        }
    }
}
