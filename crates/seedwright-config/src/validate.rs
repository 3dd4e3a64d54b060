//! Validation helpers and parsing utilities for environment values.

use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};

/// Parse a TCP port, rejecting zero and out-of-range values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is not an integer in `1..=65535`.
pub fn parse_port(field: &'static str, value: &str) -> ConfigResult<u16> {
    let port = value
        .trim()
        .parse::<u32>()
        .map_err(|_| invalid(field, value, "not_a_number"))?;
    if !(1..=65_535).contains(&port) {
        return Err(invalid(field, value, "out_of_range"));
    }
    u16::try_from(port).map_err(|_| invalid(field, value, "out_of_range"))
}

/// Parse an IPv4 or IPv6 listener address.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is not an IP address.
pub fn parse_bind_addr(field: &'static str, value: &str) -> ConfigResult<IpAddr> {
    IpAddr::from_str(value.trim()).map_err(|_| invalid(field, value, "invalid_ip"))
}

/// Parse a non-empty directory path.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is blank.
pub fn parse_dir(field: &'static str, value: &str) -> ConfigResult<PathBuf> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(field, value, "empty"));
    }
    Ok(PathBuf::from(trimmed))
}

/// Parse a log format name (`json` or `pretty`).
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for any other value.
pub fn parse_log_format(field: &'static str, value: &str) -> ConfigResult<String> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "json" | "pretty" => Ok(normalized),
        _ => Err(invalid(field, value, "unknown_format")),
    }
}

fn invalid(field: &'static str, value: &str, reason: &'static str) -> ConfigError {
    ConfigError::InvalidField {
        field,
        value: Some(value.to_string()),
        reason,
    }
}
