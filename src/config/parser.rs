use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads, parses and validates the harvester configuration
///
/// Sections and keys missing from the file take their defaults, so an empty
/// file yields the default configuration.
///
/// ```no_run
/// use std::path::Path;
/// use linkmind::config::load_config;
///
/// let config = load_config(Path::new("linkmind.toml")).unwrap();
/// println!("Workers: {}", config.harvest.worker_count());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with_hash(path).map(|(config, _)| config)
}

/// Like [`load_config`], also returning the hex SHA-256 of the file
///
/// The hash is taken from the same bytes that were parsed. `scrape` logs it
/// so a content store can be traced back to the configuration that filled it.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, config_hash(&content)))
}

/// Parses and validates configuration text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Hex SHA-256 of configuration text
pub fn config_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
