//! Decoding of raw image bytes into an RGBA pixel surface.

use image::RgbaImage;
use tracing::debug;

use crate::{RenderError, Result};

/// Decode an encoded image (PNG, JPEG, GIF, WebP, ...) into an RGBA surface.
///
/// The format is sniffed from the byte stream. Empty input, undecodable data
/// and zero-sized images are rejected before any pixel work happens.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage> {
    if bytes.is_empty() {
        return Err(RenderError::EmptyInput);
    }

    let format = image::guess_format(bytes).ok();
    let img =
        image::load_from_memory(bytes).map_err(|e| RenderError::DecodeFailure(e.to_string()))?;

    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(RenderError::DegenerateImage { width, height });
    }

    debug!(width, height, ?format, "Decoded image");
    Ok(img.to_rgba8())
}
