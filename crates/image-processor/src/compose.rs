//! Monochrome composite: writes dithered intensities back into a surface.

use image::RgbaImage;
use tracing::debug;

use crate::field::IntensityField;

/// Replicate each field sample into the R, G and B channels of `surface`.
///
/// Alpha is left as it is. Samples are clamped to 0..=255 before the
/// conversion to `u8`, so a dithered field is copied exactly.
///
/// # Panics
/// Panics if the field and surface dimensions differ.
pub fn composite(surface: &mut RgbaImage, field: &IntensityField) {
    let (width, height) = surface.dimensions();
    assert_eq!(
        (width as usize, height as usize),
        (field.width(), field.height()),
        "intensity field does not match surface dimensions"
    );
    debug!(width, height, "Compositing monochrome surface");

    for (pixel, &sample) in surface.pixels_mut().zip(field.samples()) {
        let value = sample.round().clamp(0.0, 255.0) as u8;
        pixel[0] = value;
        pixel[1] = value;
        pixel[2] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_composite_replicates_into_rgb() {
        let mut surface = RgbaImage::from_pixel(2, 1, Rgba([12, 34, 56, 255]));
        let field = IntensityField::from_samples(2, 1, vec![0.0, 255.0]).unwrap();

        composite(&mut surface, &field);

        assert_eq!(surface.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(surface.get_pixel(1, 0), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_composite_preserves_alpha() {
        let mut surface = RgbaImage::new(2, 1);
        surface.put_pixel(0, 0, Rgba([9, 9, 9, 0]));
        surface.put_pixel(1, 0, Rgba([9, 9, 9, 77]));
        let field = IntensityField::from_samples(2, 1, vec![255.0, 0.0]).unwrap();

        composite(&mut surface, &field);

        assert_eq!(surface.get_pixel(0, 0), &Rgba([255, 255, 255, 0]));
        assert_eq!(surface.get_pixel(1, 0), &Rgba([0, 0, 0, 77]));
    }

    #[test]
    #[should_panic(expected = "intensity field does not match surface dimensions")]
    fn test_composite_dimension_mismatch() {
        let mut surface = RgbaImage::new(3, 3);
        composite(&mut surface, &IntensityField::new(2, 2));
    }
}
