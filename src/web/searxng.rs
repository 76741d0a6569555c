use crate::config::Config;
use crate::web::{transport_error, SearchProvider, SearchQuery, SearchResult, WebError};
use std::time::Duration;

/// SearXNG search provider
///
/// Queries a self-hosted SearXNG instance over its JSON API. The aggregator's
/// ranking is authoritative; results are returned in the order it produced
/// them. Only the first results page is requested.
pub struct SearxngProvider {
    base_url: String,
    timeout_secs: u64,
}

impl SearxngProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.searxng_url.clone(),
            timeout_secs: config.default_timeout,
        }
    }

    /// Endpoint URL, normalizing any trailing slash on the configured base
    fn search_url(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl SearchProvider for SearxngProvider {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, WebError> {
        let categories = if query.categories.is_empty() {
            "general".to_string()
        } else {
            query.categories.join(",")
        };
        let safesearch = query.safesearch.unwrap_or(0).to_string();

        let params = [
            ("q", query.query.as_str()),
            ("format", "json"),
            ("categories", categories.as_str()),
            ("pageno", "1"),
            ("language", query.language.as_deref().unwrap_or("en")),
            ("safesearch", safesearch.as_str()),
        ];

        tracing::debug!(
            query = %query.query,
            categories = %categories,
            num_results = query.num_results,
            "performing searxng search"
        );

        // Client scoped to this call; dropped on every exit path.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| WebError::Network(e.to_string()))?;

        let response = client
            .get(self.search_url())
            .query(&params)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "searxng request failed");
            return Err(WebError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, self.timeout_secs))?;
        let data: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| WebError::Parse(e.to_string()))?;

        let mut items = Vec::new();
        if let Some(hits) = data["results"].as_array() {
            for hit in hits.iter().take(query.num_results) {
                items.push(SearchResult {
                    title: hit["title"].as_str().unwrap_or("").to_string(),
                    url: hit["url"].as_str().unwrap_or("").to_string(),
                    snippet: hit["content"].as_str().unwrap_or("").to_string(),
                    engine: hit["engine"].as_str().unwrap_or("").to_string(),
                });
            }
        }

        tracing::debug!(
            query = %query.query,
            result_count = items.len(),
            "searxng search completed"
        );

        Ok(items)
    }
}
