//! Latest-wins conversion session.
//!
//! Every submission takes a generation ticket. A conversion that finishes
//! after a newer one was submitted is discarded instead of replacing the
//! newer result.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use catprinter::PrintTransport;
use image::RgbaImage;
use image_processor::RenderOptions;
use tokio::sync::RwLock;

use super::render::{ImageSource, render_source};
use crate::error::ServiceError;

/// A finished conversion.
#[derive(Debug)]
pub struct Rendered {
    pub generation: u64,
    pub surface: RgbaImage,
}

#[derive(Debug, Default)]
pub struct RenderSession {
    generation: AtomicU64,
    current: RwLock<Option<Arc<Rendered>>>,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert `source` and make it the current result.
    pub async fn submit(
        &self,
        source: ImageSource,
        options: RenderOptions,
    ) -> Result<Arc<Rendered>, ServiceError> {
        self.submit_with(render_source(source, options)).await
    }

    /// Run `job` under a fresh generation ticket.
    ///
    /// Failures leave the current result untouched.
    pub async fn submit_with<F>(&self, job: F) -> Result<Arc<Rendered>, ServiceError>
    where
        F: Future<Output = Result<RgbaImage, ServiceError>>,
    {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = job.await;

        if !self.is_latest(ticket) {
            tracing::debug!(ticket, "Discarding superseded conversion");
            return Err(ServiceError::Superseded);
        }
        let surface = result.inspect_err(|e| tracing::warn!(ticket, "Conversion failed: {e}"))?;

        let mut current = self.current.write().await;
        // A newer submission may have been issued while waiting for the lock.
        if !self.is_latest(ticket) {
            return Err(ServiceError::Superseded);
        }
        let rendered = Arc::new(Rendered {
            generation: ticket,
            surface,
        });
        *current = Some(Arc::clone(&rendered));
        Ok(rendered)
    }

    /// The most recent finished conversion, if any.
    pub async fn current(&self) -> Option<Arc<Rendered>> {
        self.current.read().await.clone()
    }

    /// Send the current result to `transport`.
    pub async fn print_current(&self, transport: &dyn PrintTransport) -> Result<(), ServiceError> {
        let rendered = self.current().await.ok_or(ServiceError::NoImageSelected)?;
        tracing::info!(
            transport = transport.name(),
            generation = rendered.generation,
            "Printing current image"
        );
        transport.print(&rendered.surface).await?;
        Ok(())
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }
}
