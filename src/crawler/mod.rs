//! Crawler module for harvesting article content
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with soft-fail semantics
//! - A queryable document tree over parsed HTML
//! - Link discovery on a source's seed page
//! - Article extraction from content pages
//! - Job orchestration across a bounded worker pool

mod article;
mod coordinator;
mod discovery;
mod document;
mod extractor;
mod fetcher;

pub use article::Article;
pub use coordinator::{harvest_source, run_harvest, source_dir, Harvester};
pub use discovery::{collect_links, discover_links, links_in_page};
pub use document::{DocumentTree, HtmlDocument, HtmlNode, TreeNode};
pub use extractor::{
    extract, extract_article, extract_from_html, retrieve_content, ExtractError, ExtractionRule,
};
pub use fetcher::{build_http_client, FetchClient, FetchError, RawDocument};

use crate::config::Config;
use crate::output::RunSummary;
use crate::HarvestError;

/// Runs a complete harvest
///
/// This is the main entry point for a batch run. It will:
/// 1. Load the source catalog, rejecting malformed rows
/// 2. Build the fetch client from the HTTP configuration
/// 3. Run one job per source over the worker pool
/// 4. Collect the per-source reports into a summary
///
/// # Returns
///
/// * `Ok(RunSummary)` - Every source was attempted
/// * `Err(HarvestError)` - The catalog or the HTTP client could not be set up
pub async fn harvest(config: &Config) -> Result<RunSummary, HarvestError> {
    run_harvest(config).await
}
