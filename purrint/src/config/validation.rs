//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_MAC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9A-Fa-f]{2}[:\-]){5}([0-9A-Fa-f]{2})$").unwrap());
static RE_UUID_NO_HYPHEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{32}$").unwrap());
static RE_UUID_HYPHEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}$")
        .unwrap()
});

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "PRINTER_ADDRESS" => {
            if !value.is_empty()
                && !RE_MAC.is_match(value)
                && !RE_UUID_NO_HYPHEN.is_match(value)
                && !RE_UUID_HYPHEN.is_match(value)
            {
                return Err("invalid address format (expected MAC or UUID)".into());
            }
        }
        "DRY_RUN_MODE" | "CONTRAST_STRETCH" => validate_bool(value)?,
        "SCAN_TIMEOUT_SECS" => validate_int_range(value, 1, 60)?,
        _ => {}
    }
    Ok(())
}

fn validate_bool(value: &str) -> Result<(), String> {
    if value != "true" && value != "false" {
        return Err("must be 'true' or 'false'".into());
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if !(min..=max).contains(&v) {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printer_address_formats() {
        assert!(validate_setting("PRINTER_ADDRESS", "").is_ok());
        assert!(validate_setting("PRINTER_ADDRESS", "AA:BB:CC:DD:EE:FF").is_ok());
        assert!(validate_setting("PRINTER_ADDRESS", "aa-bb-cc-dd-ee-ff").is_ok());
        assert!(validate_setting("PRINTER_ADDRESS", "12345678123412341234123456789abc").is_ok());
        assert!(
            validate_setting("PRINTER_ADDRESS", "12345678-1234-1234-1234-123456789abc").is_ok()
        );
        assert!(validate_setting("PRINTER_ADDRESS", "AA:BB:CC").is_err());
        assert!(validate_setting("PRINTER_ADDRESS", "printer").is_err());
    }

    #[test]
    fn test_boolean_settings() {
        assert!(validate_setting("DRY_RUN_MODE", "true").is_ok());
        assert!(validate_setting("CONTRAST_STRETCH", "false").is_ok());
        assert!(validate_setting("DRY_RUN_MODE", "yes").is_err());
    }

    #[test]
    fn test_scan_timeout_range() {
        assert!(validate_setting("SCAN_TIMEOUT_SECS", "1").is_ok());
        assert!(validate_setting("SCAN_TIMEOUT_SECS", "60").is_ok());
        assert_eq!(
            validate_setting("SCAN_TIMEOUT_SECS", "0"),
            Err("must be between 1 and 60".to_string())
        );
        assert_eq!(
            validate_setting("SCAN_TIMEOUT_SECS", "ten"),
            Err("must be an integer".to_string())
        );
    }

    #[test]
    fn test_unknown_keys_pass() {
        assert!(validate_setting("SOMETHING_ELSE", "anything").is_ok());
    }
}
