//! scantext: a self-hostable OCR HTTP service.
//!
//! Accepts image uploads, runs a fixed preprocessing pipeline (grayscale,
//! optional downscale/denoise, binarization, morphological cleanup), feeds
//! the result to Tesseract, and returns recognized text with per-word
//! bounding boxes and confidence scores as JSON.

pub mod api;
pub mod config;
pub mod error;
pub mod ocr;
pub mod pipeline;
pub mod upload;
