//! Tesseract TSV layout parsing.
//!
//! `TessBaseAPIGetTsvText` emits one row per layout element with twelve
//! tab-separated columns: level, page_num, block_num, par_num, line_num,
//! word_num, left, top, width, height, conf, text. Structural rows (page,
//! block, paragraph, line) carry conf -1 and empty text; only word rows
//! (level 5) have real confidence values.

use serde::Serialize;

/// Tokens at or below this confidence are dropped from responses.
pub const MIN_TOKEN_CONFIDENCE: i32 = 60;

/// Tesseract layout level of an individual word.
pub const WORD_LEVEL: u32 = 5;

/// Pixel-coordinate rectangle in the processed (post-resize) image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// One recognized unit of text with its confidence, bounding box, and
/// position in Tesseract's layout hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct TokenRecord {
    pub text: String,
    /// Confidence score in 0..=100.
    pub confidence: i32,
    pub bounding_box: BoundingBox,
    pub level: u32,
    pub page_num: u32,
    pub block_num: u32,
    pub par_num: u32,
    pub line_num: u32,
    pub word_num: u32,
}

/// Parse raw TSV output into token records, keeping only tokens with
/// confidence strictly above [`MIN_TOKEN_CONFIDENCE`] and non-empty trimmed
/// text. Unparseable rows (including any header line) are skipped.
pub fn parse_filtered(tsv: &str) -> Vec<TokenRecord> {
    tsv.lines()
        .filter_map(parse_row)
        .filter(|t| t.confidence > MIN_TOKEN_CONFIDENCE && !t.text.trim().is_empty())
        .collect()
}

fn parse_row(line: &str) -> Option<TokenRecord> {
    let fields: Vec<&str> = line.splitn(12, '\t').collect();
    if fields.len() != 12 {
        return None;
    }

    // conf is a float like "96.063812", or "-1" on structural rows
    let confidence = fields[10].parse::<f32>().ok()? as i32;

    Some(TokenRecord {
        text: fields[11].to_string(),
        confidence,
        bounding_box: BoundingBox {
            left: fields[6].parse().ok()?,
            top: fields[7].parse().ok()?,
            width: fields[8].parse().ok()?,
            height: fields[9].parse().ok()?,
        },
        level: fields[0].parse().ok()?,
        page_num: fields[1].parse().ok()?,
        block_num: fields[2].parse().ok()?,
        par_num: fields[3].parse().ok()?,
        line_num: fields[4].parse().ok()?,
        word_num: fields[5].parse().ok()?,
    })
}
