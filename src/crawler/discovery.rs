//! Link discovery
//!
//! Collects candidate article URLs from a source's seed page. Every pass
//! fetches the seed page again and the results are unioned; discovered
//! links are never descended into.

use crate::crawler::document::{DocumentTree, HtmlDocument, TreeNode};
use crate::crawler::fetcher::FetchClient;
use reqwest::header::HeaderMap;
use std::collections::HashSet;
use url::Url;

/// Discovers candidate content URLs for one source
///
/// Performs `max_depth` passes over `seed` (at least one). A failed fetch
/// ends discovery and keeps whatever earlier passes found.
///
/// # Arguments
///
/// * `client` - Fetch client
/// * `seed` - Seed page URL
/// * `max_depth` - Number of passes over the seed page
/// * `link_class` - Class an anchor must carry, `None` for every anchor
/// * `headers` - Header set replacing the client defaults
pub async fn discover_links(
    client: &FetchClient,
    seed: &Url,
    max_depth: u32,
    link_class: Option<&str>,
    headers: Option<&HeaderMap>,
) -> HashSet<Url> {
    let mut links = HashSet::new();

    for pass in 1..=max_depth.max(1) {
        let document = match client.fetch(seed, headers).await {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("Link discovery pass {} for {} failed: {}", pass, seed, e);
                break;
            }
        };

        let found = links_in_page(&document.body, seed, link_class);
        tracing::debug!("Pass {} over {} found {} links", pass, seed, found.len());
        links.extend(found);
    }

    links
}

/// Parses a page and collects its anchor targets as absolute URLs
pub fn links_in_page(body: &str, base_url: &Url, link_class: Option<&str>) -> HashSet<Url> {
    let document = HtmlDocument::parse(body);
    collect_links(&document, base_url, link_class)
}

/// Collects anchor targets from a parsed document
///
/// Anchors without an `href` are skipped.
pub fn collect_links<D: DocumentTree>(
    document: &D,
    base_url: &Url,
    link_class: Option<&str>,
) -> HashSet<Url> {
    document
        .find_all_by_tag("a", link_class)
        .iter()
        .filter_map(|anchor| anchor.attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves an href against the base URL
///
/// Only hrefs that cannot be joined onto the base are excluded. Empty and
/// fragment-only hrefs resolve to the page itself, and non-HTTP targets are
/// kept as well; fetching them later counts as a fetch failure. An empty
/// trailing `#` is dropped, so `href="#"` yields the base URL.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let mut url = match base_url.join(href) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Skipping unresolvable link '{}': {}", href, e);
            return None;
        }
    };

    if url.fragment() == Some("") {
        url.set_fragment(None);
    }

    Some(url)
}
