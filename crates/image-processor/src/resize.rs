//! Image resizing for thermal printer output.
//!
//! Scales a surface to the print head width while preserving the aspect
//! ratio, using Lanczos3 filtering.

use image::RgbaImage;
use image::imageops::{self, FilterType};
use tracing::debug;

use crate::{RenderError, Result};

/// Largest output surface accepted, in pixels (about 87k rows at 384px).
pub const MAX_OUTPUT_PIXELS: u64 = 32 * 1024 * 1024;

/// Compute the output height for a `src_w`x`src_h` image scaled to `width`.
///
/// `floor(src_h * width / src_w)`, computed in integers so the result is
/// exact. A height that floors to 0 is degenerate; an output above
/// [`MAX_OUTPUT_PIXELS`] is rejected before anything is allocated.
pub fn target_height(src_w: u32, src_h: u32, width: u32) -> Result<u32> {
    if src_w == 0 || src_h == 0 {
        return Err(RenderError::DegenerateImage {
            width: src_w,
            height: src_h,
        });
    }

    let height = u64::from(src_h) * u64::from(width) / u64::from(src_w);
    if height == 0 {
        return Err(RenderError::DegenerateImage { width, height: 0 });
    }
    if u64::from(width) * height > MAX_OUTPUT_PIXELS {
        return Err(RenderError::ImageTooLarge {
            width,
            height,
            max_pixels: MAX_OUTPUT_PIXELS,
        });
    }
    u32::try_from(height).map_err(|_| RenderError::ImageTooLarge {
        width,
        height,
        max_pixels: MAX_OUTPUT_PIXELS,
    })
}

/// Resize an image to a target width while maintaining aspect ratio.
///
/// Returns a copy of the original image if it already matches the target
/// width.
pub fn resize_to_width(img: &RgbaImage, width: u32) -> Result<RgbaImage> {
    let (orig_w, orig_h) = img.dimensions();
    if width == 0 {
        return Err(RenderError::DegenerateImage {
            width,
            height: orig_h,
        });
    }
    let new_height = target_height(orig_w, orig_h, width)?;

    if orig_w == width {
        debug!(width, "Image already at target width, skipping resize");
        return Ok(img.clone());
    }

    debug!(
        orig_w,
        orig_h,
        new_width = width,
        new_height,
        "Resizing image to target width"
    );

    Ok(imageops::resize(img, width, new_height, FilterType::Lanczos3))
}
