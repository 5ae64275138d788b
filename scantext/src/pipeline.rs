//! Image preprocessing pipeline.
//!
//! Turns raw upload bytes into a binarized single-channel image tuned for
//! text recognition. Two profiles exist: `Basic` applies a global Otsu
//! threshold and leaves dimensions untouched; `Enhanced` adds downscaling,
//! Gaussian denoising, adaptive thresholding, and a morphological cleanup
//! pass. The profile is chosen per deployment via `OCR_PROFILE`.

use image::imageops::FilterType;
use image::{GrayImage, ImageFormat, ImageReader};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{close, open};
use serde::Deserialize;

use crate::error::{Result, ScanError};

/// Sigma of the denoising blur, equivalent to a 5x5 Gaussian kernel.
const DENOISE_SIGMA: f32 = 1.1;
/// Sigma of the local-mean blur backing the adaptive threshold,
/// equivalent to an 11-pixel Gaussian neighborhood.
const ADAPTIVE_SIGMA: f32 = 2.0;
/// Constant subtracted from the local mean before comparison.
const ADAPTIVE_OFFSET: i16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreprocessingProfile {
    /// Grayscale + global Otsu threshold. Dimensions are preserved.
    Basic,
    /// Downscale, denoise, adaptive threshold, morphological cleanup.
    Enhanced,
}

impl std::str::FromStr for PreprocessingProfile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "enhanced" => Ok(Self::Enhanced),
            other => Err(format!(
                "unknown preprocessing profile '{other}' (expected 'basic' or 'enhanced')"
            )),
        }
    }
}

impl std::fmt::Display for PreprocessingProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Enhanced => write!(f, "enhanced"),
        }
    }
}

/// Run the fixed preprocessing sequence over raw image bytes.
///
/// Returns a binarized grayscale image containing only the values 0 and 255.
/// With the `Enhanced` profile the longer side never exceeds `max_dimension`;
/// bounding boxes reported downstream are in these processed-image
/// coordinates, not the original upload's.
pub fn preprocess(
    bytes: &[u8],
    profile: PreprocessingProfile,
    max_dimension: u32,
) -> Result<GrayImage> {
    let reader = ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ScanError::Decode(format!("Failed to read image: {e}")))?;

    let img = reader
        .decode()
        .map_err(|e| ScanError::Decode(format!("Failed to decode image: {e}")))?;

    let mut gray = img.to_luma8();

    match profile {
        PreprocessingProfile::Basic => {
            let level = otsu_level(&gray);
            Ok(threshold(&gray, level, ThresholdType::Binary))
        }
        PreprocessingProfile::Enhanced => {
            gray = downscale_if_needed(gray, max_dimension);
            let blurred = gaussian_blur_f32(&gray, DENOISE_SIGMA);
            let binary = adaptive_gaussian_threshold(&blurred);
            // Close then open with the smallest square element to drop
            // speckle noise without eroding character strokes.
            let binary = close(&binary, Norm::LInf, 1);
            Ok(open(&binary, Norm::LInf, 1))
        }
    }
}

/// Uniformly downscale so the longer side equals `max_dimension`, preserving
/// aspect ratio. Images already within bounds are returned unchanged.
fn downscale_if_needed(gray: GrayImage, max_dimension: u32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let longer = width.max(height);
    if longer <= max_dimension {
        return gray;
    }

    let scale = max_dimension as f32 / longer as f32;
    let new_width = ((width as f32 * scale) as u32).max(1);
    let new_height = ((height as f32 * scale) as u32).max(1);
    image::imageops::resize(&gray, new_width, new_height, FilterType::Triangle)
}

/// Adaptive Gaussian threshold: each pixel is compared against the
/// Gaussian-weighted mean of its neighborhood minus a small constant.
/// Pixels above the local threshold become 255, everything else 0.
fn adaptive_gaussian_threshold(gray: &GrayImage) -> GrayImage {
    let local_mean = gaussian_blur_f32(gray, ADAPTIVE_SIGMA);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let pixel = gray.get_pixel(x, y)[0] as i16;
        let mean = local_mean.get_pixel(x, y)[0] as i16;
        if pixel > mean - ADAPTIVE_OFFSET {
            image::Luma([255])
        } else {
            image::Luma([0])
        }
    })
}

/// Encode the processed image as PNG bytes, suitable both as Tesseract input
/// and for the base64 preview in the response.
pub fn encode_png(gray: &GrayImage) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    gray.write_to(&mut std::io::Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| ScanError::Pipeline(format!("Failed to encode image: {e}")))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView};

    fn gradient_png(width: u32, height: u32) -> Vec<u8> {
        let gray = GrayImage::from_fn(width, height, |x, y| {
            image::Luma([((x + y) % 256) as u8])
        });
        let mut out = Vec::new();
        DynamicImage::ImageLuma8(gray)
            .write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    fn color_png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::new_rgb8(width, height);
        let mut out = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    fn assert_binary(img: &GrayImage) {
        for pixel in img.pixels() {
            assert!(
                pixel[0] == 0 || pixel[0] == 255,
                "expected binarized output, found value {}",
                pixel[0]
            );
        }
    }

    #[test]
    fn basic_profile_emits_only_black_and_white() {
        let bytes = gradient_png(120, 80);
        let out = preprocess(&bytes, PreprocessingProfile::Basic, 1024).unwrap();
        assert_binary(&out);
    }

    #[test]
    fn enhanced_profile_emits_only_black_and_white() {
        let bytes = gradient_png(120, 80);
        let out = preprocess(&bytes, PreprocessingProfile::Enhanced, 1024).unwrap();
        assert_binary(&out);
    }

    #[test]
    fn basic_profile_preserves_dimensions() {
        let bytes = gradient_png(2000, 700);
        let out = preprocess(&bytes, PreprocessingProfile::Basic, 1024).unwrap();
        assert_eq!(out.dimensions(), (2000, 700));
    }

    #[test]
    fn enhanced_profile_caps_longer_dimension() {
        let bytes = gradient_png(2000, 1000);
        let out = preprocess(&bytes, PreprocessingProfile::Enhanced, 1024).unwrap();
        assert_eq!(out.dimensions(), (1024, 512));
    }

    #[test]
    fn enhanced_profile_leaves_small_images_unscaled() {
        let bytes = gradient_png(640, 480);
        let out = preprocess(&bytes, PreprocessingProfile::Enhanced, 1024).unwrap();
        assert_eq!(out.dimensions(), (640, 480));
    }

    #[test]
    fn downscale_truncates_like_integer_math() {
        let gray = GrayImage::new(1500, 1000);
        let out = downscale_if_needed(gray, 1024);
        // 1000 * (1024/1500) = 682.67, truncated
        assert_eq!(out.dimensions(), (1024, 682));
    }

    #[test]
    fn rgb_input_is_accepted() {
        let bytes = color_png(100, 100);
        let out = preprocess(&bytes, PreprocessingProfile::Enhanced, 1024).unwrap();
        assert_binary(&out);
    }

    #[test]
    fn invalid_bytes_are_a_decode_error() {
        let result = preprocess(&[0, 1, 2, 3, 4, 5], PreprocessingProfile::Basic, 1024);
        assert!(matches!(result, Err(ScanError::Decode(_))));
    }

    #[test]
    fn adaptive_threshold_keeps_flat_regions_white() {
        // On a flat image every pixel equals its local mean, so the
        // mean-minus-offset comparison puts everything at 255.
        let flat = GrayImage::from_pixel(32, 32, image::Luma([128]));
        let out = adaptive_gaussian_threshold(&flat);
        for pixel in out.pixels() {
            assert_eq!(pixel[0], 255);
        }
    }

    #[test]
    fn encode_png_round_trips() {
        let gray = GrayImage::from_pixel(16, 16, image::Luma([255]));
        let bytes = encode_png(&gray).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (16, 16));
    }

    #[test]
    fn profile_parses_from_env_strings() {
        assert_eq!(
            "basic".parse::<PreprocessingProfile>().unwrap(),
            PreprocessingProfile::Basic
        );
        assert_eq!(
            "Enhanced".parse::<PreprocessingProfile>().unwrap(),
            PreprocessingProfile::Enhanced
        );
        assert!("otsu".parse::<PreprocessingProfile>().is_err());
    }
}
