//! Normalizes the panel's `total,used,free,percent` usage strings.

use crate::errors::ParseError;
use crate::models::UsageRecord;

/// Reported by the panel when a resource is missing from the response.
pub const EMPTY_USAGE: &str = "0,0,0,0";

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Renders a byte count in base-1024 units with two decimals, capped at PB.
pub fn human_bytes(bytes: i64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

pub fn parse_usage(raw: &str) -> Result<UsageRecord, ParseError> {
    let invalid = |reason: String| ParseError::Usage {
        raw: raw.to_string(),
        reason,
    };

    let values = raw
        .split(',')
        .map(|token| token.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| invalid(e.to_string()))?;

    let [total_bytes, used_bytes, free_bytes, usage_percent] = <[i64; 4]>::try_from(values)
        .map_err(|values| invalid(format!("expected 4 fields, got {}", values.len())))?;

    Ok(UsageRecord {
        used: human_bytes(used_bytes),
        total: human_bytes(total_bytes),
        free: human_bytes(free_bytes),
        used_bytes,
        total_bytes,
        free_bytes,
        usage_percent,
    })
}
