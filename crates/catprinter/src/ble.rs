//! BLE connection management using btleplug.
//!
//! Provides scanning, connecting, disconnecting, and chunked data writing
//! for thermal printer peripherals over Bluetooth Low Energy.

use std::collections::HashSet;
use std::time::Duration;

use btleplug::api::{
    Central, CentralEvent, Characteristic, Manager as _, Peripheral as _, ScanFilter, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::StreamExt;
use uuid::Uuid;

use crate::{CatPrinterError, Result};

/// Default delay between BLE write chunks.
const CHUNK_WRITE_DELAY: Duration = Duration::from_millis(20);

/// Conservative write size (185 MTU - 3 byte ATT header).
const DEFAULT_CHUNK_SIZE: usize = 182;

/// Discovered BLE device information.
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    /// Device display name (may be empty if not advertised).
    pub name: String,
    /// Platform-specific device identifier (address on Linux, UUID on macOS).
    pub id: String,
    /// The underlying btleplug peripheral handle.
    pub peripheral: Peripheral,
}

impl DiscoveredDevice {
    /// Whether this device is the one configured as `target` (address, UUID
    /// or advertised name, ignoring case and separators).
    pub fn matches(&self, target: &str) -> bool {
        device_matches_target(&self.id, &self.name, target)
    }
}

/// Manages a BLE connection to a single thermal printer.
pub struct BleConnection {
    adapter: Adapter,
    peripheral: Option<Peripheral>,
    tx_char: Option<Characteristic>,
    chunk_size: usize,
}

impl BleConnection {
    /// Create a new BLE connection manager on the first available adapter.
    pub async fn new() -> Result<Self> {
        let manager = Manager::new()
            .await
            .map_err(|e| CatPrinterError::BleConnection(e.to_string()))?;

        let adapter = manager
            .adapters()
            .await
            .map_err(|e| CatPrinterError::BleConnection(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| CatPrinterError::BleConnection("No BLE adapter found".into()))?;

        Ok(Self {
            adapter,
            peripheral: None,
            tx_char: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Scan for BLE devices advertising either service UUID.
    ///
    /// Returns every matching device seen during the `timeout` window.
    pub async fn scan_devices(
        &self,
        service_uuid: Uuid,
        fallback_uuid: Uuid,
        timeout: Duration,
    ) -> Result<Vec<DiscoveredDevice>> {
        tracing::info!(timeout_secs = timeout.as_secs(), "Starting BLE scan");

        let mut events = self
            .adapter
            .events()
            .await
            .map_err(|e| CatPrinterError::BleScan(e.to_string()))?;

        self.adapter
            .start_scan(ScanFilter::default())
            .await
            .map_err(|e| CatPrinterError::BleScan(e.to_string()))?;

        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        let mut found = Vec::new();
        let mut seen_ids = HashSet::new();

        loop {
            tokio::select! {
                _ = &mut deadline => break,
                event = events.next() => {
                    let id = match event {
                        Some(CentralEvent::DeviceDiscovered(id)) => id,
                        Some(_) => continue,
                        None => break,
                    };
                    let id_str = id.to_string();
                    if seen_ids.contains(&id_str) {
                        continue;
                    }
                    let Ok(peripheral) = self.adapter.peripheral(&id).await else {
                        continue;
                    };
                    let Ok(Some(props)) = peripheral.properties().await else {
                        continue;
                    };
                    if props.services.contains(&service_uuid) || props.services.contains(&fallback_uuid) {
                        let name = props.local_name.unwrap_or_default();
                        tracing::info!(name = %name, id = %id_str, "Found printer");
                        seen_ids.insert(id_str.clone());
                        found.push(DiscoveredDevice {
                            name,
                            id: id_str,
                            peripheral,
                        });
                    }
                }
            }
        }

        self.adapter
            .stop_scan()
            .await
            .map_err(|e| CatPrinterError::BleScan(e.to_string()))?;

        tracing::info!(count = found.len(), "BLE scan complete");
        Ok(found)
    }

    /// Connect to a specific peripheral and discover the TX characteristic.
    pub async fn connect(&mut self, device: &DiscoveredDevice, tx_uuid: Uuid) -> Result<()> {
        tracing::info!(id = %device.id, name = %device.name, "Connecting to device");

        device
            .peripheral
            .connect()
            .await
            .map_err(|e| CatPrinterError::BleConnection(e.to_string()))?;

        device
            .peripheral
            .discover_services()
            .await
            .map_err(|e| CatPrinterError::BleConnection(e.to_string()))?;

        let tx_char = device
            .peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == tx_uuid)
            .ok_or(CatPrinterError::MissingCharacteristic)?;

        self.tx_char = Some(tx_char);
        self.peripheral = Some(device.peripheral.clone());

        tracing::info!(
            chunk_size = self.chunk_size,
            "Connected and discovered characteristic"
        );
        Ok(())
    }

    /// Disconnect from the currently connected peripheral.
    pub async fn disconnect(&mut self) -> Result<()> {
        let peripheral = self.peripheral.take();
        self.tx_char = None;
        if let Some(peripheral) = peripheral {
            tracing::info!("Disconnecting BLE device");
            peripheral
                .disconnect()
                .await
                .map_err(|e| CatPrinterError::BleConnection(e.to_string()))?;
        }
        Ok(())
    }

    /// Write data to the TX characteristic in MTU-sized chunks.
    ///
    /// Inserts a small delay between chunks to avoid overwhelming the device.
    pub async fn write_data(&self, data: &[u8]) -> Result<()> {
        let peripheral = self
            .peripheral
            .as_ref()
            .ok_or(CatPrinterError::NotConnected)?;
        let tx_char = self
            .tx_char
            .as_ref()
            .ok_or(CatPrinterError::MissingCharacteristic)?;

        let total = data.len().div_ceil(self.chunk_size);
        for (i, chunk) in data.chunks(self.chunk_size).enumerate() {
            peripheral
                .write(tx_char, chunk, WriteType::WithoutResponse)
                .await
                .map_err(|e| CatPrinterError::BleWrite(format!("chunk {}/{}: {}", i + 1, total, e)))?;
            tokio::time::sleep(CHUNK_WRITE_DELAY).await;
        }

        Ok(())
    }
}

/// Lowercase an address or UUID and strip separators.
pub fn normalize_device_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn device_matches_target(device_id: &str, device_name: &str, target: &str) -> bool {
    device_id.eq_ignore_ascii_case(target)
        || normalize_device_id(device_id) == normalize_device_id(target)
        || (!device_name.is_empty() && device_name.eq_ignore_ascii_case(target))
}
