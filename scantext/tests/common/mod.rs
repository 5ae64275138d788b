use image::{DynamicImage, GrayImage, ImageFormat, Luma, RgbImage};

/// Encode an image as PNG bytes.
pub fn to_png(img: &DynamicImage) -> Vec<u8> {
    let mut out = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Png)
        .expect("PNG encoding");
    out
}

/// Plain white RGB image.
pub fn blank_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]));
    to_png(&DynamicImage::ImageRgb8(img))
}

/// White background with black horizontal bars, roughly the pixel statistics
/// of a scanned text page: strongly bimodal, mostly light.
pub fn text_like_png(width: u32, height: u32) -> Vec<u8> {
    let img = GrayImage::from_fn(width, height, |_, y| {
        if y % 20 < 4 {
            Luma([10])
        } else {
            Luma([245])
        }
    });
    to_png(&DynamicImage::ImageLuma8(img))
}

/// Smooth diagonal gradient, a worst case for global thresholding.
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let img = GrayImage::from_fn(width, height, |x, y| Luma([((x + y) % 256) as u8]));
    to_png(&DynamicImage::ImageLuma8(img))
}
