//! Cat printer transport for GB series thermal printers.
//!
//! Converts monochrome surfaces into 1-bit bitmaps, encodes them with the
//! GB wire protocol, and streams them to the printer over BLE.

pub mod bitmap;
pub mod ble;
pub mod protocol;
pub mod transport;

// Re-exports for convenience
pub use bitmap::MonoBitmap;
pub use ble::BleConnection;
pub use protocol::GbProtocol;
pub use transport::{BlePrinter, DryRunPrinter, PrintTransport};

/// Print width in pixels (standard for GB series thermal printers).
pub const PRINT_WIDTH: u32 = 384;

/// Errors that can occur during printer operations.
#[derive(Debug, thiserror::Error)]
pub enum CatPrinterError {
    #[error("Printer not found during BLE scan")]
    PrinterNotFound,

    #[error("Printer address is not configured")]
    NotConfigured,

    #[error("Missing TX characteristic on connected device")]
    MissingCharacteristic,

    #[error("BLE connection error: {0}")]
    BleConnection(String),

    #[error("BLE write error: {0}")]
    BleWrite(String),

    #[error("BLE scan error: {0}")]
    BleScan(String),

    #[error("Not connected to any device")]
    NotConnected,

    #[error("Invalid image dimensions: expected width {expected}, got {actual}")]
    InvalidImageSize { expected: u32, actual: u32 },

    #[error("Image is not black and white")]
    NotBlackWhite,

    #[error("{send}; disconnect also failed: {disconnect}")]
    SendAndDisconnect { send: String, disconnect: String },
}

/// Result type alias for catprinter operations.
pub type Result<T> = std::result::Result<T, CatPrinterError>;
