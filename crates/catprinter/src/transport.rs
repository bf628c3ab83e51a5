//! Print transports: the asynchronous `print(bitmap)` capability.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use image::RgbaImage;

use crate::ble::BleConnection;
use crate::bitmap::MonoBitmap;
use crate::protocol::GbProtocol;
use crate::{CatPrinterError, Result};

/// Settle time between connecting and the first write.
const CONNECT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Default BLE scan window.
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can put a monochrome bitmap on paper.
///
/// Failures are reported to the caller; transports never retry a job.
#[async_trait]
pub trait PrintTransport: Send + Sync {
    /// Human-readable transport name for logs.
    fn name(&self) -> &str;

    /// Print an already converted bitmap.
    async fn print_bitmap(&self, bitmap: &MonoBitmap) -> Result<()>;

    /// Print a monochrome surface.
    async fn print(&self, surface: &RgbaImage) -> Result<()> {
        let bitmap = MonoBitmap::from_surface(surface)?;
        self.print_bitmap(&bitmap).await
    }
}

/// Prints to a GB series cat printer over BLE, one connection per job.
#[derive(Debug, Clone)]
pub struct BlePrinter {
    address: String,
    scan_timeout: Duration,
    protocol: GbProtocol,
}

impl BlePrinter {
    /// `address` is the printer's MAC address, platform UUID or name.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            scan_timeout: DEFAULT_SCAN_TIMEOUT,
            protocol: GbProtocol::new(),
        }
    }

    /// Builder: set the BLE scan window.
    pub fn with_scan_timeout(mut self, timeout: Duration) -> Self {
        self.scan_timeout = timeout;
        self
    }
}

#[async_trait]
impl PrintTransport for BlePrinter {
    fn name(&self) -> &str {
        "bluetooth"
    }

    async fn print_bitmap(&self, bitmap: &MonoBitmap) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(CatPrinterError::NotConfigured);
        }

        let mut conn = BleConnection::new().await?;
        let (service_uuid, fallback_uuid) = self.protocol.scan_uuids();
        let target = conn
            .scan_devices(service_uuid, fallback_uuid, self.scan_timeout)
            .await?
            .into_iter()
            .find(|d| d.matches(&self.address))
            .ok_or(CatPrinterError::PrinterNotFound)?;

        conn.connect(&target, self.protocol.tx_characteristic())
            .await?;
        tokio::time::sleep(CONNECT_SETTLE_DELAY).await;

        let send_result = send_job(&conn, &self.protocol, bitmap).await;
        let disconnect_result = conn.disconnect().await;
        finalize_results(send_result, disconnect_result)
    }
}

async fn send_job(conn: &BleConnection, protocol: &GbProtocol, bitmap: &MonoBitmap) -> Result<()> {
    tracing::info!(
        rows = bitmap.height(),
        black_pixels = bitmap.black_pixel_count(),
        "Sending print job"
    );
    for cmd in protocol.job(bitmap) {
        conn.write_data(&cmd).await?;
    }
    Ok(())
}

/// Merge the send and disconnect outcomes, keeping both messages when both
/// failed.
fn finalize_results(send: Result<()>, disconnect: Result<()>) -> Result<()> {
    match (send, disconnect) {
        (Ok(()), Ok(())) => Ok(()),
        (Err(send_err), Ok(())) => Err(send_err),
        (Ok(()), Err(disconnect_err)) => Err(disconnect_err),
        (Err(send_err), Err(disconnect_err)) => Err(CatPrinterError::SendAndDisconnect {
            send: send_err.to_string(),
            disconnect: disconnect_err.to_string(),
        }),
    }
}

/// Encodes jobs and logs them instead of printing.
#[derive(Debug, Default)]
pub struct DryRunPrinter {
    protocol: GbProtocol,
    jobs: AtomicUsize,
}

impl DryRunPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs accepted so far.
    pub fn job_count(&self) -> usize {
        self.jobs.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PrintTransport for DryRunPrinter {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn print_bitmap(&self, bitmap: &MonoBitmap) -> Result<()> {
        let bytes: usize = self.protocol.job(bitmap).iter().map(Vec::len).sum();
        self.jobs.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            rows = bitmap.height(),
            black_pixels = bitmap.black_pixel_count(),
            bytes,
            "Print job (dry run)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PRINT_WIDTH;
    use image::Rgba;

    #[test]
    fn test_finalize_results_prefers_send_error() {
        let result = finalize_results(Err(CatPrinterError::NotConnected), Ok(()));
        assert!(matches!(result, Err(CatPrinterError::NotConnected)));
    }

    #[test]
    fn test_finalize_results_returns_disconnect_error() {
        let result = finalize_results(
            Ok(()),
            Err(CatPrinterError::BleConnection("disconnect failed".into())),
        );
        assert!(matches!(result, Err(CatPrinterError::BleConnection(_))));
    }

    #[test]
    fn test_finalize_results_reports_both_errors() {
        let result = finalize_results(
            Err(CatPrinterError::BleWrite("send failed".into())),
            Err(CatPrinterError::BleConnection("disconnect failed".into())),
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "BLE write error: send failed; disconnect also failed: BLE connection error: disconnect failed"
        );
    }

    #[tokio::test]
    async fn test_dry_run_accepts_monochrome_surface() {
        let printer = DryRunPrinter::new();
        let surface = RgbaImage::from_pixel(PRINT_WIDTH, 3, Rgba([0, 0, 0, 255]));

        printer.print(&surface).await.unwrap();

        assert_eq!(printer.job_count(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_rejects_wrong_width_before_counting() {
        let printer = DryRunPrinter::new();
        let surface = RgbaImage::from_pixel(10, 3, Rgba([0, 0, 0, 255]));

        let result = printer.print(&surface).await;

        assert!(matches!(
            result,
            Err(CatPrinterError::InvalidImageSize { .. })
        ));
        assert_eq!(printer.job_count(), 0);
    }

    #[tokio::test]
    async fn test_ble_printer_requires_address() {
        let printer = BlePrinter::new("  ");
        let surface = RgbaImage::from_pixel(PRINT_WIDTH, 1, Rgba([255, 255, 255, 255]));
        let result = printer.print(&surface).await;
        assert!(matches!(result, Err(CatPrinterError::NotConfigured)));
    }
}
