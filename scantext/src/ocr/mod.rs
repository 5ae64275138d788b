//! OCR (Optical Character Recognition) module.
//!
//! Wraps the external Tesseract engine behind [`OcrProvider`], which owns a
//! mutex-guarded `LepTess` handle and runs recognition on the blocking pool.
//! Layout extraction goes through the TSV output of the engine and is
//! filtered down to confident, non-empty tokens in [`tsv`].

mod provider;
pub mod tsv;

pub use provider::{OcrProvider, Recognition};
pub use tsv::{BoundingBox, TokenRecord, WORD_LEVEL};
