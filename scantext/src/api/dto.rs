//! Wire types for the OCR endpoints.
//!
//! Every success payload carries `success: true` and an RFC 3339 timestamp;
//! error payloads are produced by `ScanError`'s `IntoResponse` impl and carry
//! `success: false` plus a message.

use serde::Serialize;

use crate::ocr::{TokenRecord, WORD_LEVEL};

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

/// Word-level box projection used by visualization frontends: the subset of
/// [`TokenRecord`] fields needed to draw an overlay rectangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct WordBox {
    pub text: String,
    pub confidence: i32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Project the word-level (hierarchy level 5) tokens into [`WordBox`]es.
pub fn word_boxes(tokens: &[TokenRecord]) -> Vec<WordBox> {
    tokens
        .iter()
        .filter(|t| t.level == WORD_LEVEL)
        .map(|t| WordBox {
            text: t.text.clone(),
            confidence: t.confidence,
            x: t.bounding_box.left,
            y: t.bounding_box.top,
            width: t.bounding_box.width,
            height: t.bounding_box.height,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct OcrResponse {
    pub success: bool,
    /// Trimmed recognized text.
    pub text: String,
    pub word_count: usize,
    pub character_count: usize,
    /// Filtered token records; coordinates are relative to the processed
    /// (possibly downscaled) image.
    pub boxes: Vec<TokenRecord>,
    pub word_boxes: Vec<WordBox>,
    /// base64 PNG data-URI of the binarized image fed to the engine.
    pub processed_image: String,
    /// Sanitized client filename.
    pub original_filename: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct BatchResponse {
    pub success: bool,
    /// Count of files submitted, including silently skipped ones.
    pub total_files: usize,
    pub processed: usize,
    pub failed: usize,
    pub results: Vec<BatchResult>,
    pub timestamp: String,
}

/// Per-file outcome within a batch. Serializes with a `status` discriminator
/// of `"success"` or `"failed"`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchResult {
    Success {
        filename: String,
        text: String,
        word_count: usize,
    },
    Failed {
        filename: String,
        error: String,
    },
}

impl BatchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, BatchResult::Success { .. })
    }
}

/// Number of non-empty whitespace-delimited segments.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Text length excluding spaces and newlines.
pub fn character_count(text: &str) -> usize {
    text.chars().filter(|c| *c != ' ' && *c != '\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::BoundingBox;
    use pretty_assertions::assert_eq;

    fn token(level: u32, text: &str) -> TokenRecord {
        TokenRecord {
            text: text.to_string(),
            confidence: 90,
            bounding_box: BoundingBox {
                left: 1,
                top: 2,
                width: 3,
                height: 4,
            },
            level,
            page_num: 1,
            block_num: 1,
            par_num: 1,
            line_num: 1,
            word_num: 1,
        }
    }

    #[test]
    fn word_count_splits_on_whitespace() {
        assert_eq!(word_count("hello world"), 2);
        assert_eq!(word_count("  hello \n world \t again  "), 3);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n\t  "), 0);
    }

    #[test]
    fn character_count_ignores_spaces_and_newlines() {
        assert_eq!(character_count("hello world"), 10);
        assert_eq!(character_count("a b\nc"), 3);
        // tabs and carriage returns still count
        assert_eq!(character_count("a\tb\r"), 4);
    }

    #[test]
    fn word_boxes_keep_only_word_level_tokens() {
        let tokens = vec![token(4, "line"), token(5, "word"), token(5, "another")];
        let boxes = word_boxes(&tokens);
        assert_eq!(boxes.len(), 2);
        assert_eq!(
            boxes[0],
            WordBox {
                text: "word".to_string(),
                confidence: 90,
                x: 1,
                y: 2,
                width: 3,
                height: 4,
            }
        );
    }

    #[test]
    fn batch_result_serializes_with_status_tag() {
        let ok = BatchResult::Success {
            filename: "a.png".to_string(),
            text: "hi".to_string(),
            word_count: 1,
        };
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["filename"], "a.png");
        assert_eq!(json["word_count"], 1);

        let failed = BatchResult::Failed {
            filename: "b.png".to_string(),
            error: "boom".to_string(),
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "boom");
        assert!(json.get("text").is_none());
    }
}
