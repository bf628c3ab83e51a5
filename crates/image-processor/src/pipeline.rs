//! End-to-end conversion: encoded bytes in, printable monochrome surface out.

use image::RgbaImage;
use tracing::{debug, info};

use crate::compose::composite;
use crate::decode::decode;
use crate::dither::atkinson_dither;
use crate::luminance::extract_luminance;
use crate::normalize::normalize;
use crate::resize::resize_to_width;
use crate::{PAPER_WIDTH, Result};

/// Options for a single conversion.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Stretch contrast to the full 0..=255 range before dithering.
    pub contrast_stretch: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            contrast_stretch: true,
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set contrast stretch flag.
    pub fn with_contrast_stretch(mut self, val: bool) -> Self {
        self.contrast_stretch = val;
        self
    }
}

/// Decode `bytes` and convert them into a [`PAPER_WIDTH`] wide monochrome
/// surface.
pub fn render(bytes: &[u8], options: &RenderOptions) -> Result<RgbaImage> {
    let decoded = decode(bytes)?;
    render_surface(&decoded, PAPER_WIDTH, options)
}

/// Run the post-decode stages on an already decoded surface.
///
/// Every pixel of the result has R = G = B and that value is 0 or 255.
pub fn render_surface(img: &RgbaImage, width: u32, options: &RenderOptions) -> Result<RgbaImage> {
    let mut surface = resize_to_width(img, width)?;
    let mut field = extract_luminance(&surface);

    if options.contrast_stretch {
        normalize(&mut field);
    } else {
        debug!("Contrast stretch disabled");
    }

    atkinson_dither(&mut field);
    composite(&mut surface, &field);

    info!(
        width = surface.width(),
        height = surface.height(),
        "Rendered monochrome surface"
    );
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RenderError;
    use image::{DynamicImage, ImageFormat, Rgba};
    use std::io::Cursor;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn encode_png(img: RgbaImage) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    fn assert_monochrome(img: &RgbaImage) {
        for (x, y, p) in img.enumerate_pixels() {
            assert!(
                p[0] == p[1] && p[1] == p[2] && (p[0] == 0 || p[0] == 255),
                "Pixel ({x}, {y}) = {p:?}, expected pure black or white"
            );
        }
    }

    #[test]
    fn test_checkerboard_passes_through_unchanged() {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, BLACK);
        img.put_pixel(1, 0, WHITE);
        img.put_pixel(0, 1, WHITE);
        img.put_pixel(1, 1, BLACK);

        let result = render_surface(&img, 2, &RenderOptions::default()).unwrap();

        assert_eq!(result, img);
    }

    #[test]
    fn test_uniform_mid_gray_starts_black() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([128, 128, 128, 255]));

        let result = render_surface(&img, 4, &RenderOptions::default()).unwrap();

        assert_monochrome(&result);
        // 128 is not strictly above the threshold, so the first pixel is black.
        assert_eq!(result.get_pixel(0, 0), &BLACK);
        // Its diffused error (128 / 8) pushes the next pixel over the threshold.
        assert_eq!(result.get_pixel(1, 0), &WHITE);
    }

    #[test]
    fn test_uniform_mid_gray_single_pixel_is_black() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([128, 128, 128, 255]));
        let result = render_surface(&img, 1, &RenderOptions::default()).unwrap();
        assert_eq!(result.get_pixel(0, 0), &BLACK);
    }

    #[test]
    fn test_render_produces_paper_width() {
        let img = RgbaImage::from_fn(100, 50, |x, y| {
            let v = ((x * 2 + y) % 256) as u8;
            Rgba([v, v / 2, 255 - v, 255])
        });

        let result = render(&encode_png(img), &RenderOptions::default()).unwrap();

        assert_eq!(result.dimensions(), (PAPER_WIDTH, 192));
        assert_monochrome(&result);
    }

    #[test]
    fn test_render_preserves_alpha_channel() {
        let img = RgbaImage::from_pixel(3, 1, Rgba([200, 200, 200, 40]));
        let result = render_surface(&img, 3, &RenderOptions::default()).unwrap();
        assert!(result.pixels().all(|p| p[3] == 40));
    }

    #[test]
    fn test_contrast_stretch_changes_low_contrast_result() {
        // Dark, low-contrast image: 40..=60 gray.
        let img = RgbaImage::from_fn(8, 8, |x, _| {
            let v = 40 + (x as u8) * 20 / 7;
            Rgba([v, v, v, 255])
        });
        let white_count = |img: &RgbaImage| img.pixels().filter(|p| p[0] == 255).count();

        let flat = render_surface(&img, 8, &RenderOptions::new().with_contrast_stretch(false))
            .unwrap();
        let stretched = render_surface(&img, 8, &RenderOptions::new()).unwrap();

        assert_monochrome(&flat);
        assert_monochrome(&stretched);
        assert!(white_count(&stretched) > white_count(&flat));
    }

    #[test]
    fn test_render_rejects_bad_input() {
        let options = RenderOptions::default();
        assert!(matches!(render(&[], &options), Err(RenderError::EmptyInput)));
        assert!(matches!(
            render(b"GIF89a-not-really", &options),
            Err(RenderError::DecodeFailure(_))
        ));
    }

    #[test]
    fn test_render_surface_rejects_empty_surface() {
        let img = RgbaImage::new(0, 5);
        assert!(matches!(
            render_surface(&img, PAPER_WIDTH, &RenderOptions::default()),
            Err(RenderError::DegenerateImage { .. })
        ));
    }

    #[test]
    fn test_render_surface_rejects_strip_that_floors_to_zero_rows() {
        let img = RgbaImage::from_pixel(1000, 1, WHITE);
        assert!(matches!(
            render_surface(&img, PAPER_WIDTH, &RenderOptions::default()),
            Err(RenderError::DegenerateImage { width: 384, height: 0 })
        ));
    }

    #[test]
    fn test_render_surface_rejects_oversized_output() {
        let img = RgbaImage::from_pixel(1, 200_000, WHITE);
        assert!(matches!(
            render_surface(&img, PAPER_WIDTH, &RenderOptions::default()),
            Err(RenderError::ImageTooLarge { .. })
        ));
    }

    #[test]
    fn test_default_options() {
        assert!(RenderOptions::default().contrast_stretch);
    }
}
