//! Upload validation and persistence.
//!
//! The allow-list and upload directory come from [`UploadConfig`] rather than
//! process-wide state, so tests can construct throwaway configurations.

use chrono::Utc;
use std::path::PathBuf;

use crate::config::UploadConfig;
use crate::error::{Result, ScanError};

/// True when the filename carries an extension on the configured allow-list.
/// The comparison is case-insensitive and only looks at the final extension.
pub fn is_allowed(filename: &str, allowed_extensions: &[String]) -> bool {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            let ext = ext.to_lowercase();
            allowed_extensions.iter().any(|allowed| *allowed == ext)
        }
        _ => false,
    }
}

/// Validate a single-file upload, returning the sanitized filename.
///
/// Errors carry the exact client-facing message; nothing here panics or
/// propagates a framework error past this layer.
pub fn validate(filename: &str, size: usize, config: &UploadConfig) -> Result<String> {
    if filename.is_empty() {
        return Err(ScanError::InvalidUpload("No file selected".to_string()));
    }
    if !is_allowed(filename, &config.allowed_extensions) {
        return Err(ScanError::InvalidUpload(format!(
            "File type not allowed. Allowed types: {}",
            config.allowed_extensions.join(", ")
        )));
    }
    if size > config.max_file_size {
        return Err(ScanError::PayloadTooLarge {
            max_bytes: config.max_file_size,
        });
    }
    Ok(sanitize_filename(filename))
}

/// Strip a client-supplied filename down to a safe basename.
///
/// Path separators and anything outside `[A-Za-z0-9._-]` become underscores,
/// and leading dots are dropped so the result can never escape the upload
/// directory or hide as a dotfile. An empty result falls back to "upload".
pub fn sanitize_filename(filename: &str) -> String {
    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let cleaned: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Persist the raw upload under `{timestamp}_{sanitized}` in the upload
/// directory. Collisions are only possible within the same second and are
/// accepted as overwrite.
pub async fn persist(config: &UploadConfig, sanitized_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let stamped = format!("{}_{}", Utc::now().format("%Y%m%d_%H%M%S"), sanitized_name);
    let path = config.dir.join(stamped);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_config() -> UploadConfig {
        UploadConfig {
            dir: PathBuf::from("uploads"),
            allowed_extensions: ["png", "jpg", "jpeg", "bmp", "gif", "tiff", "pdf"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_size: 16 * 1024 * 1024,
            persist: false,
        }
    }

    #[test]
    fn allows_listed_extensions_case_insensitively() {
        let allowed = test_config().allowed_extensions;
        assert!(is_allowed("scan.png", &allowed));
        assert!(is_allowed("SCAN.PNG", &allowed));
        assert!(is_allowed("report.v2.jpeg", &allowed));
    }

    #[test]
    fn rejects_unlisted_and_missing_extensions() {
        let allowed = test_config().allowed_extensions;
        assert!(!is_allowed("payload.exe", &allowed));
        assert!(!is_allowed("noextension", &allowed));
        assert!(!is_allowed(".png", &allowed));
    }

    #[test]
    fn validate_rejects_empty_filename() {
        let err = validate("", 10, &test_config()).unwrap_err();
        assert_eq!(err.to_string(), "No file selected");
    }

    #[test]
    fn validate_lists_allowed_types_on_rejection() {
        let err = validate("virus.exe", 10, &test_config()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("File type not allowed."));
        assert!(msg.contains("png"));
        assert!(msg.contains("pdf"));
    }

    #[test]
    fn validate_rejects_oversized_files() {
        let mut config = test_config();
        config.max_file_size = 100;
        let err = validate("scan.png", 101, &config).unwrap_err();
        assert!(matches!(err, ScanError::PayloadTooLarge { .. }));
    }

    #[test]
    fn validate_returns_sanitized_name() {
        let name = validate("my scan (1).png", 10, &test_config()).unwrap();
        assert_eq!(name, "my_scan__1_.png");
    }

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd.png"), "passwd.png");
        assert_eq!(sanitize_filename("c:\\temp\\scan.png"), "scan.png");
    }

    #[test]
    fn sanitize_strips_leading_dots() {
        assert_eq!(sanitize_filename(".hidden.png"), "hidden.png");
    }

    #[test]
    fn sanitize_never_returns_empty() {
        assert_eq!(sanitize_filename("..."), "upload");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[tokio::test]
    async fn persist_writes_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config();
        config.dir = dir.path().to_path_buf();

        let path = persist(&config, "scan.png", b"bytes").await.unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.ends_with("_scan.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"bytes");
    }
}
