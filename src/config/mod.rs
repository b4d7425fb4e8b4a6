//! Configuration module for LinkMind
//!
//! This module handles loading, parsing, and validating the TOML harvester
//! configuration, including the default request headers handed to the fetch
//! client.
//!
//! # Example
//!
//! ```no_run
//! use linkmind::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkmind.toml")).unwrap();
//! println!("Harvesting into: {}", config.harvest.root.display());
//! ```

mod headers;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HarvestConfig, HttpConfig};

// Re-export parser and header helpers
pub use headers::{default_headers, to_header_map};
pub use parser::{config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
