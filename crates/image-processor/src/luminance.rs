//! Per-pixel luminance extraction.

use image::RgbaImage;
use tracing::debug;

use crate::field::IntensityField;

/// Reduce every pixel to the unweighted mean of its R, G and B channels.
///
/// Alpha is ignored.
pub fn extract_luminance(img: &RgbaImage) -> IntensityField {
    let (width, height) = img.dimensions();
    debug!(width, height, "Extracting luminance");

    let samples = img
        .pixels()
        .map(|p| (f32::from(p[0]) + f32::from(p[1]) + f32::from(p[2])) / 3.0)
        .collect();

    IntensityField::from_samples(width as usize, height as usize, samples)
        .unwrap_or_else(|| IntensityField::new(width as usize, height as usize))
}
