//! # Validation Utilities
//!
//! Input validation helpers.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate a `0x`-prefixed, 20-byte hex account or contract address.
///
/// Checksum casing is not verified; the node accepts any casing.
pub fn validate_evm_address(value: &str, field_name: &str) -> Result<(), String> {
    let hex = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| format!("{} must start with 0x", field_name))?;

    if hex.len() != 40 {
        return Err(format!("{} must be 40 hex characters after 0x", field_name));
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("{} contains non-hex characters", field_name));
    }
    Ok(())
}

/// Validate that a URL uses the http or https scheme.
pub fn validate_http_url(value: &str, field_name: &str) -> Result<(), String> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(format!("{} must be an http(s) URL", field_name))
    }
}
