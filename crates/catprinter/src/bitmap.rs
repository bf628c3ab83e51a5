//! 1-bit print bitmaps built from monochrome surfaces.

use image::RgbaImage;

use crate::{CatPrinterError, PRINT_WIDTH, Result};

/// Pixels with alpha below this are left unprinted.
const OPAQUE_ALPHA: u8 = 128;

/// A print-head-wide bitmap, one byte per pixel (0 = paper, 1 = black),
/// stored row by row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl MonoBitmap {
    /// Convert a monochrome surface into a print bitmap.
    ///
    /// The surface must be exactly [`PRINT_WIDTH`] pixels wide and every pixel
    /// must have R = G = B with a value of 0 or 255. Transparent pixels are
    /// treated as paper.
    pub fn from_surface(surface: &RgbaImage) -> Result<Self> {
        let (width, height) = surface.dimensions();
        if width != PRINT_WIDTH {
            return Err(CatPrinterError::InvalidImageSize {
                expected: PRINT_WIDTH,
                actual: width,
            });
        }

        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for p in surface.pixels() {
            let [r, g, b, a] = p.0;
            if r != g || g != b || (r != 0 && r != 255) {
                return Err(CatPrinterError::NotBlackWhite);
            }
            pixels.push(u8::from(r == 0 && a >= OPAQUE_ALPHA));
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Iterate over pixel rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks(self.width as usize)
    }

    /// Number of pixels that will be printed black.
    pub fn black_pixel_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p == 1).count()
    }
}
