//! Atkinson error-diffusion dithering.
//!
//! Binarizes a normalized intensity field in place, pushing a share of each
//! pixel's quantization error onto neighbours that have not been visited yet.

use tracing::debug;

use crate::field::IntensityField;

/// Samples strictly above this value become white.
const THRESHOLD: f32 = 128.0;

const WHITE: f32 = 255.0;
const BLACK: f32 = 0.0;

/// Each neighbour receives 1/8 of the quantization error.
const ERROR_DIVISOR: f32 = 8.0;

/// Atkinson kernel as `(dx, dy)` offsets from the current pixel:
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
///
/// Six shares of 1/8 are distributed; the remaining 2/8 are dropped.
const ATKINSON_NEIGHBORS: [(isize, usize); 6] = [(1, 0), (2, 0), (-1, 1), (0, 1), (1, 1), (0, 2)];

/// Apply Atkinson dithering to an intensity field in place.
///
/// Sweeps top to bottom, left to right. Every sample ends up exactly 0 or
/// 255. Diffusion targets outside the field are skipped.
pub fn atkinson_dither(field: &mut IntensityField) {
    let (width, height) = (field.width(), field.height());
    debug!(width, height, "Applying Atkinson dithering");

    for y in 0..height {
        for x in 0..width {
            quantize_at(field, x, y);
        }
    }

    debug!("Atkinson dithering complete");
}

/// Finalize the sample at `(x, y)` and diffuse its error.
///
/// Returns the per-neighbour error share.
pub(crate) fn quantize_at(field: &mut IntensityField, x: usize, y: usize) -> f32 {
    let index = field.index(x, y);
    let old_pixel = field.samples()[index];
    let new_pixel = if old_pixel > THRESHOLD { WHITE } else { BLACK };
    field.samples_mut()[index] = new_pixel;

    let error = (old_pixel - new_pixel) / ERROR_DIVISOR;
    distribute_error(field, x, y, error);
    error
}

/// Add `error` to each in-bounds Atkinson neighbour of `(x, y)`.
fn distribute_error(field: &mut IntensityField, x: usize, y: usize, error: f32) {
    let (width, height) = (field.width(), field.height());

    for (dx, dy) in ATKINSON_NEIGHBORS {
        let Some(nx) = x.checked_add_signed(dx).filter(|&nx| nx < width) else {
            continue;
        };
        let ny = y + dy;
        if ny >= height {
            continue;
        }
        let index = field.index(nx, ny);
        field.samples_mut()[index] += error;
    }
}
