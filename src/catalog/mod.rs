//! Source catalog module
//!
//! The source catalog is a CSV file with one row per crawl target:
//!
//! ```text
//! category,url,linkClass,articleTag,articleClass,maxDepth,headers
//! tech,https://news.example.com/,headline,article,,1,
//! ```
//!
//! Rows are validated one by one. A malformed row is rejected before any job
//! is scheduled for it, and the remaining rows are still harvested.

mod reader;

pub use reader::{load_catalog, parse_catalog, parse_tag};

use crate::crawler::ExtractionRule;
use std::collections::BTreeMap;
use url::Url;

/// One crawl target and its extraction rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    /// Category label, used as the first path segment of the store
    pub category: String,

    /// Seed page for link discovery
    pub url: Url,

    /// Class an anchor must carry to be considered (None = every anchor)
    pub link_class: Option<String>,

    /// Tag name of the element holding the article body
    pub article_tag: String,

    /// Class the article element must carry (None = any)
    pub article_class: Option<String>,

    /// Number of discovery passes over the seed page (always >= 1)
    pub max_depth: u32,

    /// Request headers replacing the configured defaults for this source
    pub headers: Option<BTreeMap<String, String>>,
}

impl SourceSpec {
    /// Creates a source with no link filter, no article class, depth 1 and
    /// default headers
    pub fn new(category: impl Into<String>, url: Url, article_tag: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            url,
            link_class: None,
            article_tag: article_tag.into(),
            article_class: None,
            max_depth: 1,
            headers: None,
        }
    }

    /// Returns the extraction rule for article pages of this source
    pub fn extraction_rule(&self) -> ExtractionRule {
        ExtractionRule {
            tag: self.article_tag.clone(),
            class: self.article_class.clone(),
        }
    }
}

/// A catalog row that was rejected during loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    /// 1-based line number in the catalog file
    pub line: u64,

    /// Why the row was rejected
    pub reason: String,
}

/// Result of loading a source catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogLoad {
    /// Valid sources, in file order
    pub sources: Vec<SourceSpec>,

    /// Rows that failed validation
    pub rejected: Vec<RowRejection>,
}
