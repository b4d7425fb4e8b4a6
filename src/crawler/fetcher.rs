//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by the harvester:
//! - Building the HTTP client with bounded timeouts
//! - Applying the configured default headers, or per-source overrides
//! - Classifying failures into [`FetchError`] kinds
//!
//! Fetching never retries and never panics. Every failure comes back as a
//! `FetchError` value which callers treat as "no content from this URL".

use crate::config::{to_header_map, HttpConfig};
use crate::HarvestError;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Final URL after redirects
    pub url: Url,

    /// HTTP status code
    pub status_code: u16,

    /// Page body content
    pub body: String,
}

/// Reasons a fetch produced no document
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {error}")]
    Connect { url: String, error: String },

    #[error("HTTP {status_code} for {url}")]
    Status { url: String, status_code: u16 },

    #[error("Failed to read body of {url}: {error}")]
    Body { url: String, error: String },

    #[error("Request failed for {url}: {error}")]
    Request { url: String, error: String },
}

impl FetchError {
    /// The URL the failed request was made for
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Connect { url, .. }
            | Self::Status { url, .. }
            | Self::Body { url, .. }
            | Self::Request { url, .. } => url,
        }
    }

    fn classify(url: &Url, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_connect() {
            Self::Connect {
                url,
                error: error.to_string(),
            }
        } else if error.is_body() || error.is_decode() {
            Self::Body {
                url,
                error: error.to_string(),
            }
        } else {
            Self::Request {
                url,
                error: error.to_string(),
            }
        }
    }
}

/// Builds an HTTP client with bounded per-request timeouts
///
/// Redirects follow reqwest's default policy. No default headers are set on
/// the client itself; [`FetchClient`] attaches the header set per request.
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Header-configurable HTTP GET with soft-fail semantics
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    default_headers: HeaderMap,
}

impl FetchClient {
    /// Creates a fetch client from the HTTP configuration
    ///
    /// The configured header set becomes the default for every request that
    /// does not carry its own headers.
    pub fn new(config: &HttpConfig) -> Result<Self, HarvestError> {
        let client = build_http_client(config)?;
        let default_headers = to_header_map(&config.headers)?;
        Ok(Self::with_client(client, default_headers))
    }

    /// Wraps an existing client with the given default headers
    pub fn with_client(client: Client, default_headers: HeaderMap) -> Self {
        Self {
            client,
            default_headers,
        }
    }

    /// Headers used when a caller supplies none
    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Fetches a URL
    ///
    /// `headers` replaces the default header set for this request when
    /// supplied. Non-success statuses, connection failures and timeouts are
    /// all returned as [`FetchError`].
    pub async fn fetch(
        &self,
        url: &Url,
        headers: Option<&HeaderMap>,
    ) -> Result<RawDocument, FetchError> {
        let headers = headers.unwrap_or(&self.default_headers).clone();

        let response = self
            .client
            .get(url.clone())
            .headers(headers)
            .send()
            .await
            .map_err(|e| FetchError::classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status_code: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::classify(url, e))?;

        Ok(RawDocument {
            url: final_url,
            status_code: status.as_u16(),
            body,
        })
    }
}
