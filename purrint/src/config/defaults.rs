//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Setting definitions in display order.
pub const SETTING_DEFS: &[SettingDef] = &[
    SettingDef {
        key: "PRINTER_ADDRESS",
        default: "",
        description: "Bluetooth MAC address or UUID of the printer",
    },
    SettingDef {
        key: "DRY_RUN_MODE",
        default: "false",
        description: "Log print jobs instead of sending them to the printer",
    },
    SettingDef {
        key: "CONTRAST_STRETCH",
        default: "true",
        description: "Stretch image contrast to the full range before dithering",
    },
    SettingDef {
        key: "SCAN_TIMEOUT_SECS",
        default: "10",
        description: "Bluetooth scan window in seconds",
    },
];

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, &'static SettingDef>> =
    LazyLock::new(|| SETTING_DEFS.iter().map(|def| (def.key, def)).collect());

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}
