//! Content extraction
//!
//! Turns one article page into an [`Article`]: the text of the first element
//! matching the source's extraction rule, plus the document title. Anything
//! short of a complete title/body pair is reported as an [`ExtractError`].

use crate::crawler::article::Article;
use crate::crawler::document::{DocumentTree, HtmlDocument, TreeNode};
use crate::crawler::fetcher::{FetchClient, FetchError};
use reqwest::header::HeaderMap;
use thiserror::Error;
use url::Url;

/// Which element of an article page holds the body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRule {
    /// Tag name of the container element
    pub tag: String,

    /// Class the container must carry, `None` for any
    pub class: Option<String>,
}

impl ExtractionRule {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class: None,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        self.class = if class.trim().is_empty() {
            None
        } else {
            Some(class)
        };
        self
    }
}

/// Why a page yielded no article
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("No <{tag}> element matches the extraction rule")]
    MissingContainer { tag: String },

    #[error("Matched element has no text")]
    EmptyContent,

    #[error("Document has no title")]
    MissingTitle,
}

impl ExtractError {
    /// True for pages that were fetched but did not fit the rule
    ///
    /// Misses are expected variability across sites, not failures.
    pub fn is_miss(&self) -> bool {
        !matches!(self, Self::Fetch(_))
    }
}

/// Fetches a page and extracts its article
pub async fn extract(
    client: &FetchClient,
    url: &Url,
    rule: &ExtractionRule,
    headers: Option<&HeaderMap>,
) -> Result<Article, ExtractError> {
    let document = client.fetch(url, headers).await?;
    extract_from_html(&document.body, rule)
}

/// Extracts the article of a single arbitrary URL
///
/// Entry point for on-demand classification outside the batch harvest;
/// same contract as [`extract`], using the client's default headers unless
/// `headers` is given.
pub async fn retrieve_content(
    client: &FetchClient,
    url: &Url,
    rule: &ExtractionRule,
    headers: Option<&HeaderMap>,
) -> Result<Article, ExtractError> {
    extract(client, url, rule, headers).await
}

/// Parses a page body and extracts its article
pub fn extract_from_html(body: &str, rule: &ExtractionRule) -> Result<Article, ExtractError> {
    let document = HtmlDocument::parse(body);
    extract_article(&document, rule)
}

/// Extracts an article from a parsed document
///
/// The content is the text of every `<p>` inside the first matching
/// container, joined with single spaces; a container without paragraphs
/// contributes its whole text. Both content and title must be non-blank.
pub fn extract_article<D: DocumentTree>(
    document: &D,
    rule: &ExtractionRule,
) -> Result<Article, ExtractError> {
    let container = document
        .find_by_tag(&rule.tag, rule.class.as_deref())
        .ok_or_else(|| ExtractError::MissingContainer {
            tag: rule.tag.clone(),
        })?;

    let paragraphs = container.find_all_by_tag("p", None);
    let text = if paragraphs.is_empty() {
        container.text()
    } else {
        paragraphs
            .iter()
            .map(|paragraph| paragraph.text())
            .collect::<Vec<_>>()
            .join(" ")
    };

    let content = text.trim();
    if content.is_empty() {
        return Err(ExtractError::EmptyContent);
    }

    let title = document.title().ok_or(ExtractError::MissingTitle)?;

    Ok(Article::new(title, content))
}
