use crate::html::HtmlToText;
use crate::web::{transport_error, WebError};
use std::time::Duration;

/// Identifying User-Agent sent with every page fetch
const USER_AGENT: &str = "Mozilla/5.0 (compatible; websearch-tool/0.1)";

/// Marker appended when fetched content exceeds the configured length limit
const TRUNCATION_MARKER: &str = "\n\n[Content truncated...]";

/// Maximum redirect hops followed per fetch
const MAX_REDIRECTS: usize = 10;

/// Fetch a page and render it as text.
///
/// Issues one GET with redirect-following, branches on the response
/// content-type, and truncates the rendered text to `max_content_length`
/// characters. HTML bodies go through `converter`; JSON bodies are wrapped in
/// a fenced code block whose markers survive truncation; other `text/*`
/// bodies pass through as-is; anything else becomes a placeholder naming the
/// content-type.
pub async fn fetch_page(
    url: &str,
    converter: &dyn HtmlToText,
    timeout_secs: u64,
    max_content_length: usize,
) -> Result<String, WebError> {
    let parsed =
        reqwest::Url::parse(url).map_err(|_| WebError::InvalidUrl(url.to_string()))?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(WebError::InvalidUrl(url.to_string()));
    }

    tracing::debug!(url = %url, "fetching page");

    // Client scoped to this call; dropped on every exit path.
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| WebError::Network(e.to_string()))?;

    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| transport_error(e, timeout_secs))?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(url = %url, status = %status, "fetch request failed");
        return Err(WebError::Status(status.as_u16()));
    }

    let final_url = response.url().clone();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(e, timeout_secs))?;

    let text = if content_type.contains("text/html") {
        converter.convert(&body, final_url.as_str())?
    } else if content_type.contains("application/json") {
        // The body is cut to the length limit before wrapping so the closing fence is
        // never truncated away.
        return Ok(format!(
            "```json\n{}\n```",
            truncate_chars(&body, max_content_length)
        ));
    } else if content_type.starts_with("text/") {
        body
    } else {
        format!("[Binary content: {}]", content_type)
    };

    tracing::debug!(
        url = %url,
        content_type = %content_type,
        converter = converter.name(),
        content_len = text.len(),
        "fetch complete"
    );

    Ok(truncate_with_marker(text, max_content_length))
}

/// Cut `text` to at most `max` characters
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        text.chars().take(max).collect()
    } else {
        text.to_string()
    }
}

/// Cut `text` to at most `max` characters, appending the truncation marker
/// when anything was dropped
fn truncate_with_marker(text: String, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}{TRUNCATION_MARKER}")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_within_limit() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_chars_over_limit() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_with_marker_exact_shape() {
        let out = truncate_with_marker("abcdefghijklmnopqrst".to_string(), 10);
        assert_eq!(out, "abcdefghij\n\n[Content truncated...]");
    }

    #[test]
    fn test_truncate_with_marker_untouched_within_limit() {
        let out = truncate_with_marker("short".to_string(), 10);
        assert_eq!(out, "short");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let out = truncate_chars("日本語テキスト", 3);
        assert_eq!(out, "日本語");
    }
}
