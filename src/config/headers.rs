//! Request header sets
//!
//! Header sets travel through the configuration as plain string maps and are
//! converted into a `HeaderMap` once, when the fetch client or a source job
//! is set up.

use crate::ConfigError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Returns the default request header set
///
/// Used whenever neither the configuration file nor a source row supplies
/// its own headers.
pub fn default_headers() -> BTreeMap<String, String> {
    [
        ("User-Agent", DEFAULT_USER_AGENT),
        ("Accept-Language", "en-US,en;q=0.9"),
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        ),
        ("Referer", "https://www.google.com/"),
        ("Cache-Control", "no-cache"),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value.to_string()))
    .collect()
}

/// Converts a string header map into a `HeaderMap`
///
/// # Returns
///
/// * `Ok(HeaderMap)` - All names and values are valid HTTP tokens
/// * `Err(ConfigError::InvalidHeader)` - The first offending header
pub fn to_header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, ConfigError> {
    let mut map = HeaderMap::with_capacity(headers.len());

    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|e| ConfigError::InvalidHeader(format!("name '{}': {}", name, e)))?;
        let header_value = HeaderValue::from_str(value.trim())
            .map_err(|e| ConfigError::InvalidHeader(format!("value for '{}': {}", name, e)))?;
        map.insert(header_name, header_value);
    }

    Ok(map)
}
