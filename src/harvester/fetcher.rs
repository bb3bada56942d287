//! HTTP fetcher implementation
//!
//! This module handles every HTTP request the harvester makes:
//! - Building one shared HTTP client with the configured user agent
//! - GET requests for the seed page and each related-link target
//! - Strict status checking (only `200 OK` is accepted)
//! - Turning the response body into a queryable `Document`

use crate::config::UserAgentConfig;
use crate::HarvestError;
use reqwest::{Client, StatusCode};
use scraper::Html;

/// A parsed HTML page together with the URL it was fetched from
///
/// `Html` is not `Send`, so a `Document` must not be held across an `.await`
/// inside a spawned task.
#[derive(Debug)]
pub struct Document {
    url: String,
    html: Html,
}

impl Document {
    /// Parses `body` as an HTML document fetched from `url`
    ///
    /// HTML parsing is lenient: malformed markup still yields a document.
    pub fn parse(url: impl Into<String>, body: &str) -> Self {
        Self {
            url: url.into(),
            html: Html::parse_document(body),
        }
    }

    /// The URL this document was fetched from
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn html(&self) -> &Html {
        &self.html
    }
}

/// Builds an HTTP client with proper configuration
///
/// No request timeout is set and reqwest's default redirect policy applies.
///
/// # Example
///
/// ```no_run
/// use article_harvester::config::UserAgentConfig;
/// use article_harvester::harvester::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Downloads pages and turns them into documents
///
/// Cloning is cheap; all clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with a fresh client for `config`
    pub fn from_user_agent(config: &UserAgentConfig) -> Result<Self, HarvestError> {
        Ok(Self::new(build_http_client(config)?))
    }

    /// Fetches `url` and parses the response body
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Connection/transport failure | `HarvestError::Http` |
    /// | Any status other than 200 | `HarvestError::Status` |
    /// | Body could not be read | `HarvestError::HtmlParse` |
    ///
    /// The response is dropped on every return path, which releases the
    /// underlying connection.
    pub async fn fetch(&self, url: &str) -> Result<Document, HarvestError> {
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|source| HarvestError::Http {
                    url: url.to_string(),
                    source,
                })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(HarvestError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| HarvestError::HtmlParse {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        tracing::trace!("Fetched {} ({} bytes)", url, body.len());

        Ok(Document::parse(url, &body))
    }
}
