use crate::catalog::{CatalogLoad, RowRejection, SourceSpec};
use crate::config::to_header_map;
use crate::ConfigError;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use url::Url;

const REQUIRED_COLUMNS: usize = 6;

/// Loads the source catalog from a CSV file
///
/// The first row is a header row and is skipped. Invalid rows end up in
/// [`CatalogLoad::rejected`] instead of failing the whole load.
///
/// # Returns
///
/// * `Ok(CatalogLoad)` - Valid sources and rejected rows
/// * `Err(ConfigError)` - The file could not be opened
pub fn load_catalog(path: &Path) -> Result<CatalogLoad, ConfigError> {
    let file = std::fs::File::open(path)?;
    Ok(parse_catalog(file))
}

/// Parses a source catalog from any reader
pub fn parse_catalog<R: Read>(input: R) -> CatalogLoad {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);

    let mut load = CatalogLoad::default();

    for record in reader.records() {
        match record {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                match parse_row(&record) {
                    Ok(source) => load.sources.push(source),
                    Err(e) => {
                        tracing::warn!("Rejecting catalog row {}: {}", line, e);
                        load.rejected.push(RowRejection {
                            line,
                            reason: e.to_string(),
                        });
                    }
                }
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                tracing::warn!("Rejecting unreadable catalog row {}: {}", line, e);
                load.rejected.push(RowRejection {
                    line,
                    reason: e.to_string(),
                });
            }
        }
    }

    load
}

/// Validates a single catalog row and converts it into a source
fn parse_row(record: &StringRecord) -> Result<SourceSpec, ConfigError> {
    if record.len() < REQUIRED_COLUMNS {
        return Err(ConfigError::Validation(format!(
            "expected at least {} columns, got {}",
            REQUIRED_COLUMNS,
            record.len()
        )));
    }

    let field = |index: usize| record.get(index).unwrap_or_default();

    let category = parse_category(field(0))?;
    let url = parse_seed_url(field(1))?;
    let link_class = optional(field(2));
    let article_tag = parse_tag(field(3))?;
    let article_class = optional(field(4));
    let max_depth = parse_max_depth(field(5))?;
    let headers = parse_headers(record.get(6).unwrap_or_default())?;

    Ok(SourceSpec {
        category,
        url,
        link_class,
        article_tag,
        article_class,
        max_depth,
        headers,
    })
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// The category becomes a directory name, so it must be a single safe segment
fn parse_category(value: &str) -> Result<String, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation("category cannot be empty".to_string()));
    }

    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "category '{}' must contain only alphanumeric characters, '-' or '_'",
            value
        )));
    }

    Ok(value.to_string())
}

fn parse_seed_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "'{}' must use http or https",
            value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!("'{}' has no host", value)));
    }

    Ok(url)
}

/// Checks that `value` is a bare HTML tag name and lowercases it
///
/// Anything else (`div p`, `div.x`) would be read as a CSS selector.
pub fn parse_tag(value: &str) -> Result<String, ConfigError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::Validation(format!(
            "'{}' is not a valid tag name",
            value
        )));
    }

    Ok(value.to_ascii_lowercase())
}

fn parse_max_depth(value: &str) -> Result<u32, ConfigError> {
    let depth: u32 = value.parse().map_err(|_| {
        ConfigError::Validation(format!("maxDepth '{}' is not a non-negative integer", value))
    })?;

    if depth < 1 {
        return Err(ConfigError::Validation(format!(
            "maxDepth must be >= 1, got {}",
            depth
        )));
    }

    Ok(depth)
}

fn parse_headers(value: &str) -> Result<Option<BTreeMap<String, String>>, ConfigError> {
    if value.is_empty() {
        return Ok(None);
    }

    let headers: BTreeMap<String, String> = serde_json::from_str(value)
        .map_err(|e| ConfigError::InvalidHeader(format!("headers column: {}", e)))?;

    // Reject early so a bad header never reaches the fetch client
    to_header_map(&headers)?;

    Ok(Some(headers))
}
