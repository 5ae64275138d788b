use std::env;
use std::path::PathBuf;

use serde::Deserialize;

use crate::pipeline::PreprocessingProfile;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// File extensions accepted for upload when `ALLOWED_EXTENSIONS` is unset.
const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tiff", "pdf"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub pipeline: PipelineConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Raises the default log verbosity. Mirrors a framework debug flag.
    pub debug: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Directory where raw uploads are persisted (when `persist` is set).
    pub dir: PathBuf,
    /// Lowercased extension allow-list applied to uploaded filenames.
    pub allowed_extensions: Vec<String>,
    /// Per-file size limit in bytes.
    pub max_file_size: usize,
    /// Keep a timestamped copy of each accepted upload on disk.
    pub persist: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub profile: PreprocessingProfile,
    /// Longest image side after the enhanced profile's downscale step.
    pub max_dimension: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Comma-separated ISO 639-2 language codes passed to Tesseract.
    pub languages: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("PORT", 5000),
                debug: parse_env_or("DEBUG", false),
            },
            upload: UploadConfig {
                dir: PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string())),
                allowed_extensions: env::var("ALLOWED_EXTENSIONS")
                    .map(|exts| {
                        exts.split(',')
                            .map(|s| s.trim().to_lowercase())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_else(|_| {
                        DEFAULT_ALLOWED_EXTENSIONS
                            .iter()
                            .map(|s| s.to_string())
                            .collect()
                    }),
                max_file_size: parse_env_or("MAX_UPLOAD_BYTES", 16 * 1024 * 1024),
                persist: parse_env_or("SAVE_UPLOADS", true),
            },
            pipeline: PipelineConfig {
                profile: parse_env_or("OCR_PROFILE", PreprocessingProfile::Enhanced),
                max_dimension: parse_env_or("OCR_MAX_DIMENSION", 1024),
            },
            ocr: OcrConfig {
                languages: env::var("OCR_LANGUAGES").unwrap_or_else(|_| "eng".to_string()),
                timeout_secs: parse_env_or("OCR_TIMEOUT", 60),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
