use crate::config::Config;
use crate::html::{self, HtmlToText};
use crate::tool::base::{Tool, ToolContext, ToolError, ToolResult};
use crate::web::fetch::fetch_page;
use crate::web::searxng::SearxngProvider;
use crate::web::{SearchProvider, SearchQuery, SearchResult, WebError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Requested operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Search,
    Fetch,
}

/// Arguments for the web_search tool.
///
/// The required subset of the optional fields depends on the action:
/// search needs `query`, fetch needs `url`. The handlers re-validate this
/// even though the host schema should already enforce it.
#[derive(Debug, Clone, Deserialize)]
pub struct WebSearchArgs {
    pub action: Action,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub num_results: Option<usize>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub safesearch: Option<u8>,
}

/// Result of a search or fetch operation.
///
/// Exactly one of `results`/`content` is populated depending on the action.
/// Failures surface as the `Err` variant of the returned `Result`, never as
/// a field here.
#[derive(Debug, Clone, Serialize)]
pub struct WebSearchOutput {
    pub action: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<SearchResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Web search tool - keyword search via a SearXNG aggregator plus page
/// fetch-and-convert.
///
/// Holds only read-only collaborators, so concurrent calls are independent.
pub struct WebSearchTool {
    config: Config,
    provider: Arc<dyn SearchProvider>,
    converter: &'static dyn HtmlToText,
}

impl WebSearchTool {
    pub fn new(config: Config) -> Self {
        let provider = Arc::new(SearxngProvider::new(&config));
        Self {
            config,
            provider,
            converter: html::default_converter(),
        }
    }

    /// Construct with explicit collaborators, e.g. to force a converter tier
    /// or substitute a provider in tests
    pub fn with_parts(
        config: Config,
        provider: Arc<dyn SearchProvider>,
        converter: &'static dyn HtmlToText,
    ) -> Self {
        Self {
            config,
            provider,
            converter,
        }
    }

    /// Route to the search or fetch handler based on the action tag
    pub async fn run(&self, args: WebSearchArgs) -> Result<WebSearchOutput, WebError> {
        match args.action {
            Action::Search => self.search(&args).await,
            Action::Fetch => self.fetch(&args).await,
        }
    }

    async fn search(&self, args: &WebSearchArgs) -> Result<WebSearchOutput, WebError> {
        let query = match args.query.as_deref() {
            Some(q) if !q.trim().is_empty() => q,
            _ => return Err(WebError::MissingParameter("query")),
        };

        let request = SearchQuery {
            query: query.to_string(),
            categories: args.categories.clone().unwrap_or_default(),
            num_results: args.num_results.unwrap_or(self.config.max_results),
            language: args.language.clone(),
            safesearch: args.safesearch,
        };

        let results = self.provider.search(&request).await?;

        Ok(WebSearchOutput {
            action: "search".to_string(),
            success: true,
            results: Some(results),
            content: None,
            url: None,
        })
    }

    async fn fetch(&self, args: &WebSearchArgs) -> Result<WebSearchOutput, WebError> {
        let url = match args.url.as_deref() {
            Some(u) if !u.is_empty() => u,
            _ => return Err(WebError::MissingParameter("url")),
        };

        let content = fetch_page(
            url,
            self.converter,
            self.config.default_timeout,
            self.config.max_content_length,
        )
        .await?;

        Ok(WebSearchOutput {
            action: "fetch".to_string(),
            success: true,
            results: None,
            content: Some(content),
            // Echo the requested URL, not the redirect-resolved one;
            // callers correlate on their input.
            url: Some(url.to_string()),
        })
    }
}

/// Deserialize raw host params, surfacing an unrecognized action distinctly
fn parse_args(params: serde_json::Value) -> Result<WebSearchArgs, ToolError> {
    match serde_json::from_value(params.clone()) {
        Ok(args) => Ok(args),
        Err(e) => {
            if let Some(action) = params.get("action").and_then(|v| v.as_str()) {
                if !matches!(action, "search" | "fetch") {
                    return Err(WebError::UnknownAction(action.to_string()).into());
                }
            }
            Err(ToolError::InvalidParams(e.to_string()))
        }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn id(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web using a self-hosted SearXNG instance or fetch and \
         extract content from web pages. \
         Use action='search' with a query to find relevant URLs. \
         Use action='fetch' with a URL to retrieve the page content as text. \
         Supports language, safesearch, and categories parameters for \
         refined searches."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["search", "fetch"],
                    "description": "Action to perform: 'search' for keyword search, 'fetch' to get page content"
                },
                "query": {
                    "type": "string",
                    "description": "Search query (required for 'search' action)"
                },
                "url": {
                    "type": "string",
                    "description": "URL to fetch (required for 'fetch' action)",
                    "format": "uri"
                },
                "categories": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Search categories (e.g., ['general', 'news', 'images']). Default is general"
                },
                "num_results": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Number of results to return (overrides the configured default)"
                },
                "language": {
                    "type": "string",
                    "description": "Language code for search results (e.g., 'en', 'fr'). Default is 'en'"
                },
                "safesearch": {
                    "type": "integer",
                    "minimum": 0,
                    "maximum": 2,
                    "description": "Safe search level (0=off, 1=moderate, 2=strict). Default is 0"
                }
            },
            "required": ["action"]
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: &ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let args = parse_args(params)?;
        let query = args.query.clone();
        let output = self.run(args).await?;

        match output.action.as_str() {
            "search" => {
                let results = output.results.unwrap_or_default();
                let query = query.unwrap_or_default();

                let mut text = format!("Search: {}\n", query);
                text.push_str(&format!("Found {} results\n\n", results.len()));

                if results.is_empty() {
                    text.push_str("No results found. Try a different query.\n");
                } else {
                    for (idx, item) in results.iter().enumerate() {
                        text.push_str(&format!(
                            "{}. {}\n   {}\n   {}\n\n",
                            idx + 1,
                            item.title,
                            item.url,
                            item.snippet
                        ));
                    }
                }

                let results_json =
                    serde_json::to_value(&results).map_err(anyhow::Error::from)?;

                Ok(ToolResult::new(format!("Web search: {}", query), text)
                    .with_metadata("action", json!("search"))
                    .with_metadata("num_results", json!(results.len()))
                    .with_metadata("results", results_json))
            }
            _ => {
                let content = output.content.unwrap_or_default();
                let url = output.url.unwrap_or_default();
                let content_length = content.len();

                Ok(ToolResult::new(format!("Fetched {}", url), content)
                    .with_metadata("action", json!("fetch"))
                    .with_metadata("url", json!(url))
                    .with_metadata("content_length", json!(content_length)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubProvider {
        hits: Vec<SearchResult>,
    }

    #[async_trait]
    impl SearchProvider for StubProvider {
        async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, WebError> {
            Ok(self
                .hits
                .iter()
                .take(query.num_results)
                .cloned()
                .collect())
        }
    }

    fn hit(n: usize) -> SearchResult {
        SearchResult {
            title: format!("Result {n}"),
            url: format!("https://example.com/{n}"),
            snippet: String::new(),
            engine: String::new(),
        }
    }

    fn stub_tool(hits: Vec<SearchResult>) -> WebSearchTool {
        WebSearchTool::with_parts(
            Config::default(),
            Arc::new(StubProvider { hits }),
            &crate::html::RegexStripper,
        )
    }

    fn search_args(query: Option<&str>) -> WebSearchArgs {
        WebSearchArgs {
            action: Action::Search,
            query: query.map(str::to_string),
            url: None,
            categories: None,
            num_results: None,
            language: None,
            safesearch: None,
        }
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let tool = stub_tool(vec![]);

        let result = tool.run(search_args(None)).await;
        assert!(matches!(
            result,
            Err(WebError::MissingParameter("query"))
        ));

        let result = tool.run(search_args(Some("   "))).await;
        assert!(matches!(
            result,
            Err(WebError::MissingParameter("query"))
        ));
    }

    #[tokio::test]
    async fn test_search_resolves_num_results_from_config() {
        let tool = stub_tool((0..15).map(hit).collect());

        let output = tool.run(search_args(Some("rust"))).await.unwrap();
        let results = output.results.unwrap();
        // Config::default().max_results caps the stub's 15 hits
        assert_eq!(results.len(), 10);
        assert_eq!(results[0].title, "Result 0");
    }

    #[tokio::test]
    async fn test_search_num_results_override() {
        let tool = stub_tool((0..15).map(hit).collect());

        let mut args = search_args(Some("rust"));
        args.num_results = Some(3);
        let output = tool.run(args).await.unwrap();
        assert_eq!(output.results.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_requires_url() {
        let tool = stub_tool(vec![]);

        let mut args = search_args(None);
        args.action = Action::Fetch;
        let result = tool.run(args).await;
        assert!(matches!(result, Err(WebError::MissingParameter("url"))));
    }

    #[tokio::test]
    async fn test_fetch_rejects_url_without_scheme_before_network() {
        let tool = stub_tool(vec![]);

        let mut args = search_args(None);
        args.action = Action::Fetch;
        args.url = Some("example.com".to_string());
        let result = tool.run(args).await;
        assert!(matches!(result, Err(WebError::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_args_unknown_action() {
        let result = parse_args(json!({"action": "explode"}));
        match result {
            Err(ToolError::Web(WebError::UnknownAction(action))) => {
                assert_eq!(action, "explode");
            }
            other => panic!("expected UnknownAction, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_args_missing_action() {
        let result = parse_args(json!({"query": "rust"}));
        assert!(matches!(result, Err(ToolError::InvalidParams(_))));
    }

    #[test]
    fn test_parse_args_valid_search() {
        let args = parse_args(json!({
            "action": "search",
            "query": "rust async",
            "num_results": 5
        }))
        .unwrap();
        assert_eq!(args.action, Action::Search);
        assert_eq!(args.query.as_deref(), Some("rust async"));
        assert_eq!(args.num_results, Some(5));
    }
}
