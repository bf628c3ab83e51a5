use catprinter::CatPrinterError;
use image_processor::RenderError;

/// Errors surfaced to the user by the conversion and print services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Printing failed: {0}")]
    Printer(#[from] CatPrinterError),

    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode preview: {0}")]
    Encode(String),

    #[error("Conversion task failed: {0}")]
    Task(String),

    #[error("Please select an image first")]
    NoImageSelected,

    #[error("Conversion superseded by a newer image")]
    Superseded,
}
