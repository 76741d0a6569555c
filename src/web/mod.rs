pub mod fetch;
pub mod searxng;

use serde::{Deserialize, Serialize};

/// Individual search result as returned by the aggregator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Page title
    pub title: String,
    /// Page URL
    pub url: String,
    /// Snippet/description of the page content (empty when the engine omits it)
    #[serde(default)]
    pub snippet: String,
    /// Engine that produced the hit (empty when the aggregator omits it)
    #[serde(default)]
    pub engine: String,
}

/// Resolved input for one search request
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub query: String,
    /// Search categories; empty means the provider default ("general")
    pub categories: Vec<String>,
    /// Maximum number of results, already resolved against the config default
    pub num_results: usize,
    /// Language code; None means the provider default ("en")
    pub language: Option<String>,
    /// Safe search level 0-2; None means the provider default (0 = off)
    pub safesearch: Option<u8>,
}

/// Web tool errors
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Request failed: HTTP {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

/// Search provider abstraction - different aggregators can be plugged in
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Perform a search and return ranked hits in aggregator order
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, WebError>;
}

/// Map a reqwest transport error to the web error taxonomy.
///
/// `timeout_secs` is the configured per-call ceiling, reported back to the
/// caller so timeout failures name the limit that was hit.
pub(crate) fn transport_error(e: reqwest::Error, timeout_secs: u64) -> WebError {
    if e.is_timeout() {
        WebError::Timeout(timeout_secs)
    } else {
        WebError::Network(e.to_string())
    }
}
