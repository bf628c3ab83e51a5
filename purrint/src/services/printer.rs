//! Printer service helpers (BLE scan + transport selection).

use std::time::Duration;

use catprinter::{BleConnection, BlePrinter, DryRunPrinter, GbProtocol, PrintTransport};
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::ServiceError;

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredPrinter {
    pub mac_address: String,
    pub name: String,
    pub last_seen: String,
}

/// Scan for nearby GB printers. Named devices come first.
pub async fn scan_printers(timeout: Duration) -> Result<Vec<DiscoveredPrinter>, ServiceError> {
    let conn = BleConnection::new().await?;
    let (service_uuid, fallback_uuid) = GbProtocol::new().scan_uuids();

    let devices = conn
        .scan_devices(service_uuid, fallback_uuid, timeout)
        .await?;

    let now = chrono::Utc::now().to_rfc3339();
    let mut printers = devices
        .into_iter()
        .map(|d| DiscoveredPrinter {
            mac_address: d.id,
            name: d.name,
            last_seen: now.clone(),
        })
        .collect::<Vec<_>>();

    sort_printers(&mut printers);
    Ok(printers)
}

fn sort_printers(printers: &mut [DiscoveredPrinter]) {
    printers.sort_by(|a, b| {
        let a_has_name = !a.name.is_empty();
        let b_has_name = !b.name.is_empty();
        b_has_name
            .cmp(&a_has_name)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.mac_address.cmp(&b.mac_address))
    });
}

/// Pick the transport described by `config`.
pub fn transport_for(config: &AppConfig) -> Box<dyn PrintTransport> {
    if config.dry_run_mode {
        tracing::info!("Dry-run mode: print jobs will only be logged");
        Box::new(DryRunPrinter::new())
    } else {
        Box::new(
            BlePrinter::new(config.printer_address.clone())
                .with_scan_timeout(config.scan_timeout()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printer(name: &str, mac: &str) -> DiscoveredPrinter {
        DiscoveredPrinter {
            mac_address: mac.to_string(),
            name: name.to_string(),
            last_seen: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_named_printers_sort_first() {
        let mut printers = vec![
            printer("", "00:00:00:00:00:01"),
            printer("MX10", "00:00:00:00:00:03"),
            printer("GB02", "00:00:00:00:00:04"),
            printer("GB02", "00:00:00:00:00:02"),
        ];
        sort_printers(&mut printers);

        let order: Vec<_> = printers.iter().map(|p| p.mac_address.as_str()).collect();
        assert_eq!(
            order,
            [
                "00:00:00:00:00:02",
                "00:00:00:00:00:04",
                "00:00:00:00:00:03",
                "00:00:00:00:00:01",
            ]
        );
    }

    #[test]
    fn test_serializes_for_json_output() {
        let json = serde_json::to_value(printer("GB02", "AA:BB:CC:DD:EE:FF")).unwrap();
        assert_eq!(json["mac_address"], "AA:BB:CC:DD:EE:FF");
        assert_eq!(json["name"], "GB02");
        assert!(json["last_seen"].is_string());
    }

    #[test]
    fn test_transport_follows_dry_run_flag() {
        let mut config = AppConfig::default();
        config.dry_run_mode = true;
        assert_eq!(transport_for(&config).name(), "dry-run");

        config.dry_run_mode = false;
        config.printer_address = "AA:BB:CC:DD:EE:FF".into();
        assert_eq!(transport_for(&config).name(), "bluetooth");
    }
}
