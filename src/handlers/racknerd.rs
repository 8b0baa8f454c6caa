//! VPS usage from the RackNerd (SolusVM) client API.

use crate::errors::{ApiError, ParseError};
use crate::models::{AppState, RackNerdStats};
use crate::services::usage::{parse_usage, EMPTY_USAGE};
use crate::services::xml::parse_fragments;

const STAGE: &str = "RackNerd data";

pub async fn fetch(state: &AppState) -> Result<RackNerdStats, ApiError> {
    let config = state.settings.racknerd.clone()?;

    tracing::info!("Fetching RackNerd data");
    let url = format!("{}/api/client/command.php", config.base_url);
    let query = [
        ("key", config.key.as_str()),
        ("hash", config.hash.as_str()),
        ("action", "info"),
        ("bw", "true"),
        ("mem", "true"),
        ("hdd", "true"),
    ];
    let raw = state
        .client
        .get_with_query(&url, &query)
        .await
        .map_err(ApiError::fetch(STAGE))?;

    parse_info(&raw).map_err(ApiError::parse(STAGE))
}

/// Missing usage fields fall back to all zeroes; missing address or status
/// become `null`.
pub fn parse_info(raw: &[u8]) -> Result<RackNerdStats, ParseError> {
    let text = std::str::from_utf8(raw).map_err(|e| ParseError::Xml(e.to_string()))?;
    let mut fields = parse_fragments(text)?;

    let usage = |name: &str| {
        parse_usage(fields.get(name).map(String::as_str).unwrap_or(EMPTY_USAGE))
    };
    let bandwidth = usage("bw")?;
    let memory = usage("mem")?;
    let disk = usage("hdd")?;

    Ok(RackNerdStats {
        bandwidth,
        memory,
        disk,
        ip_address: fields.remove("ipaddress"),
        status: fields.remove("status"),
    })
}
