//! Runtime application configuration loaded from the environment.

use std::time::Duration;

use image_processor::RenderOptions;

use super::SettingInfo;
use super::defaults::{SETTING_DEFS, get_default};
use super::validation::validate_setting;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub printer_address: String,
    pub dry_run_mode: bool,
    pub contrast_stretch: bool,
    pub scan_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            printer_address: String::new(),
            dry_run_mode: false,
            contrast_stretch: true,
            scan_timeout_secs: 10,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, falling back to
    /// defaults for unset or empty keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> Result<String, anyhow::Error> {
            let value = lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| get_default(key).unwrap_or_default().to_string());
            validate_setting(key, &value)
                .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;
            Ok(value)
        };

        Ok(Self {
            printer_address: g("PRINTER_ADDRESS")?,
            dry_run_mode: g("DRY_RUN_MODE")? == "true",
            contrast_stretch: g("CONTRAST_STRETCH")? == "true",
            scan_timeout_secs: g("SCAN_TIMEOUT_SECS")?.parse()?,
        })
    }

    /// Override the printer address, applying the `PRINTER_ADDRESS` checks.
    pub fn set_printer_address(&mut self, address: &str) -> Result<(), anyhow::Error> {
        let address = address.trim();
        validate_setting("PRINTER_ADDRESS", address)
            .map_err(|e| anyhow::anyhow!("validation error for PRINTER_ADDRESS: {e}"))?;
        self.printer_address = address.to_string();
        Ok(())
    }

    pub fn scan_timeout(&self) -> Duration {
        Duration::from_secs(self.scan_timeout_secs)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new().with_contrast_stretch(self.contrast_stretch)
    }

    /// Effective settings, in definition order.
    pub fn settings(&self) -> Vec<SettingInfo> {
        SETTING_DEFS
            .iter()
            .map(|def| {
                let value = match def.key {
                    "PRINTER_ADDRESS" => self.printer_address.clone(),
                    "DRY_RUN_MODE" => self.dry_run_mode.to_string(),
                    "CONTRAST_STRETCH" => self.contrast_stretch.to_string(),
                    "SCAN_TIMEOUT_SECS" => self.scan_timeout_secs.to_string(),
                    _ => def.default.to_string(),
                };
                SettingInfo {
                    key: def.key.to_string(),
                    is_default: value == def.default,
                    value,
                    description: def.description.to_string(),
                }
            })
            .collect()
    }
}
