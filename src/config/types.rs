use crate::config::headers::default_headers;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main configuration structure for LinkMind
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Harvest run configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HarvestConfig {
    /// Root directory of the content store
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Path to the source catalog CSV
    #[serde(default = "default_sources")]
    pub sources: PathBuf,

    /// Number of concurrent source jobs (defaults to available CPUs)
    #[serde(default)]
    pub workers: Option<usize>,
}

impl HarvestConfig {
    /// Returns the size of the worker pool
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            sources: default_sources(),
            workers: None,
        }
    }
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Total timeout for a single request (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout for a single request (seconds)
    #[serde(
        rename = "connect-timeout-secs",
        default = "default_connect_timeout_secs"
    )]
    pub connect_timeout_secs: u64,

    /// Request headers used for every source that does not supply its own
    #[serde(default = "default_headers")]
    pub headers: BTreeMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            headers: default_headers(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("/tmp/linkmind")
}

fn default_sources() -> PathBuf {
    PathBuf::from("./resources/sources.csv")
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}
