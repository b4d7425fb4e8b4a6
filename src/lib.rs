//! LinkMind: a concurrent content harvester
//!
//! This crate harvests article text from a configured catalog of web sources,
//! de-duplicates it by title, and persists it into a per-source content store
//! that downstream text classification tooling reads as a plain-text corpus.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for LinkMind operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// Configuration-specific errors
///
/// Covers both the harvester configuration file and the source catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid HTTP header: {0}")]
    InvalidHeader(String),
}

/// Result type alias for LinkMind operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::{load_catalog, SourceSpec};
pub use config::Config;
pub use crawler::{retrieve_content, Article, Harvester};
pub use storage::{slugify, Repository};
