use image::{imageops, GrayImage, RgbImage};
use imageproc::contrast::otsu_level;
use imageproc::edges::canny;

/// Canny edges with thresholds derived from the frame's Otsu level:
/// high = level, low = level / 2
pub fn otsu_canny(frame: &RgbImage) -> GrayImage {
    let _span = tracing::debug_span!("edges").entered();

    let gray = imageops::grayscale(frame);
    let high = f32::from(otsu_level(&gray));
    if high == 0.0 {
        // Flat frame
        return GrayImage::new(gray.width(), gray.height());
    }
    canny(&gray, 0.5 * high, high)
}
