//! Conversion service: read image bytes, run the pipeline, emit previews.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use image_processor::{PAPER_WIDTH, RenderOptions, decode, render_surface};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::ServiceError;

/// Where the image bytes of a conversion come from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    File(PathBuf),
    Stdin,
    Bytes(Vec<u8>),
}

impl ImageSource {
    /// `-` selects stdin, anything else is a file path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Stdin => "<stdin>".to_string(),
            Self::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        }
    }
}

/// Read every byte of `source`.
pub async fn read_source(source: ImageSource) -> Result<Vec<u8>, ServiceError> {
    match source {
        ImageSource::File(path) => Ok(tokio::fs::read(&path).await?),
        ImageSource::Stdin => {
            let mut bytes = Vec::new();
            tokio::io::stdin().read_to_end(&mut bytes).await?;
            Ok(bytes)
        }
        ImageSource::Bytes(bytes) => Ok(bytes),
    }
}

/// Convert `source` into a printable monochrome surface.
///
/// Decoding runs on the blocking pool; the remaining stages run inline.
pub async fn render_source(
    source: ImageSource,
    options: RenderOptions,
) -> Result<RgbaImage, ServiceError> {
    let label = source.describe();
    let bytes = read_source(source).await?;
    tracing::debug!(source = %label, bytes = bytes.len(), "Read image");

    let decoded = tokio::task::spawn_blocking(move || decode(&bytes))
        .await
        .map_err(|e| ServiceError::Task(e.to_string()))??;

    let surface = render_surface(&decoded, PAPER_WIDTH, &options)?;
    tracing::info!(
        source = %label,
        width = surface.width(),
        height = surface.height(),
        "Converted image"
    );
    Ok(surface)
}

/// Encode a surface as PNG.
pub fn surface_to_png_bytes(surface: &RgbaImage) -> Result<Vec<u8>, ServiceError> {
    let mut buf = Cursor::new(Vec::new());
    surface
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| ServiceError::Encode(e.to_string()))?;
    Ok(buf.into_inner())
}

/// Write a PNG preview to `path`, or to stdout when `path` is `None`.
pub async fn write_preview(surface: &RgbaImage, path: Option<&Path>) -> Result<(), ServiceError> {
    let png = surface_to_png_bytes(surface)?;
    match path {
        Some(path) => {
            tokio::fs::write(path, &png).await?;
            tracing::info!(path = %path.display(), bytes = png.len(), "Wrote preview");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&png).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}
