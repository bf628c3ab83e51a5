//! Image processing pipeline for thermal printer output.
//!
//! Turns an arbitrary raster image into a 384px wide black-and-white surface:
//! decode, resize, luminance extraction, contrast stretch, Atkinson dithering
//! and a final monochrome composite.

pub mod compose;
pub mod decode;
pub mod dither;
pub mod field;
pub mod luminance;
pub mod normalize;
pub mod pipeline;
pub mod resize;

// Re-exports for convenience
pub use compose::composite;
pub use decode::decode;
pub use dither::atkinson_dither;
pub use field::IntensityField;
pub use luminance::extract_luminance;
pub use normalize::normalize;
pub use pipeline::{RenderOptions, render, render_surface};
pub use resize::{MAX_OUTPUT_PIXELS, resize_to_width, target_height};

/// Standard thermal printer paper width in pixels.
pub const PAPER_WIDTH: u32 = 384;

/// Errors that abort a conversion before any bitmap is produced.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Image data is empty")]
    EmptyInput,

    #[error("Failed to decode image: {0}")]
    DecodeFailure(String),

    #[error("Degenerate image dimensions: {width}x{height}")]
    DegenerateImage { width: u32, height: u32 },

    #[error("Output too large: {width}x{height} exceeds {max_pixels} pixels")]
    ImageTooLarge {
        width: u32,
        height: u64,
        max_pixels: u64,
    },
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, RenderError>;
