//! HTML to text conversion strategies.
//!
//! Three tiers of decreasing fidelity and decreasing external dependency,
//! selected by compile-time capability (cargo features) rather than runtime
//! probing. The first available tier always wins; the regex tier is always
//! compiled so the chain never comes up empty.

use crate::web::WebError;

/// Single seam for HTML conversion so tests can force a specific tier
pub trait HtmlToText: Send + Sync {
    /// Strategy identifier, e.g. for logging
    fn name(&self) -> &'static str;

    /// Convert an HTML document to plain-text/markdown-ish output.
    ///
    /// `base_url` is the final resolved URL of the page; strategies may use
    /// it for link resolution or ignore it entirely.
    fn convert(&self, html: &str, base_url: &str) -> Result<String, WebError>;
}

/// All compiled-in strategies, best first. Never empty: the regex tier has no
/// optional dependency and is always present as the last entry.
pub fn available_converters() -> Vec<&'static dyn HtmlToText> {
    let mut tiers: Vec<&'static dyn HtmlToText> = Vec::new();
    #[cfg(feature = "markdown")]
    tiers.push(&MarkdownConverter);
    #[cfg(feature = "dom")]
    tiers.push(&DomExtractor);
    tiers.push(&RegexStripper);
    tiers
}

/// The preferred strategy for this build
pub fn default_converter() -> &'static dyn HtmlToText {
    available_converters()[0]
}

/// Tier 1: HTML -> Markdown via `htmd`, ATX headings, noisy elements skipped
#[cfg(feature = "markdown")]
pub struct MarkdownConverter;

#[cfg(feature = "markdown")]
impl HtmlToText for MarkdownConverter {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn convert(&self, html: &str, _base_url: &str) -> Result<String, WebError> {
        use htmd::options::{HeadingStyle, Options};
        use htmd::HtmlToMarkdown;

        let converter = HtmlToMarkdown::builder()
            .options(Options {
                heading_style: HeadingStyle::Atx,
                ..Default::default()
            })
            .skip_tags(vec!["script", "style", "nav", "footer", "header"])
            .build();

        converter
            .convert(html)
            .map_err(|e| WebError::Parse(format!("HTML conversion failed: {e}")))
    }
}

/// Tier 2: DOM parse via `scraper`, text nodes joined with newlines
#[cfg(feature = "dom")]
pub struct DomExtractor;

#[cfg(feature = "dom")]
impl HtmlToText for DomExtractor {
    fn name(&self) -> &'static str {
        "dom"
    }

    fn convert(&self, html: &str, _base_url: &str) -> Result<String, WebError> {
        use scraper::Html;

        let document = Html::parse_document(html);
        let mut lines = Vec::new();
        collect_text(&document.root_element(), &mut lines);

        Ok(collapse_newlines(lines.join("\n").trim()))
    }
}

/// Recursively gather trimmed text nodes, skipping noisy subtrees entirely
#[cfg(feature = "dom")]
fn collect_text(element: &scraper::ElementRef<'_>, lines: &mut Vec<String>) {
    use scraper::Node;

    const SKIP: [&str; 7] = [
        "script", "style", "nav", "footer", "header", "aside", "noscript",
    ];

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    lines.push(trimmed.to_string());
                }
            }
            Node::Element(el) => {
                if SKIP.contains(&el.name()) {
                    continue;
                }
                if let Some(child_el) = scraper::ElementRef::wrap(child) {
                    collect_text(&child_el, lines);
                }
            }
            _ => {}
        }
    }
}

/// Tier 3: regex-based stripping, no optional dependencies
pub struct RegexStripper;

impl HtmlToText for RegexStripper {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn convert(&self, html: &str, _base_url: &str) -> Result<String, WebError> {
        let script = regex::Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap();
        let style = regex::Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap();
        let tags = regex::Regex::new(r"<[^>]+>").unwrap();
        let spaces = regex::Regex::new(r"[ \t]+").unwrap();

        let text = script.replace_all(html, "");
        let text = style.replace_all(&text, "");
        let text = tags.replace_all(&text, " ");
        let text = html_escape::decode_html_entities(&text).to_string();
        let text = spaces.replace_all(&text, " ");

        Ok(collapse_newlines(text.trim()))
    }
}

/// Collapse runs of 3+ newlines down to exactly 2
fn collapse_newlines(text: &str) -> String {
    let newlines = regex::Regex::new(r"\n{3,}").unwrap();
    newlines.replace_all(text, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = concat!(
        "<html><head><title>T</title><style>body { color: red }</style></head>",
        "<body><nav>menu</nav><h1>Heading</h1>",
        "<script>bad()</script><p>Hello &amp; welcome</p>",
        "<footer>fine print</footer></body></html>",
    );

    #[test]
    fn test_chain_ends_with_regex_tier() {
        let tiers = available_converters();
        assert!(!tiers.is_empty());
        assert_eq!(tiers.last().unwrap().name(), "regex");
    }

    #[cfg(feature = "markdown")]
    #[test]
    fn test_chain_prefers_markdown_tier() {
        assert_eq!(default_converter().name(), "markdown");
    }

    #[cfg(feature = "markdown")]
    #[test]
    fn test_markdown_tier_atx_headings_and_stripping() {
        let text = MarkdownConverter.convert(PAGE, "https://example.com").unwrap();
        assert!(text.contains("# Heading"));
        assert!(text.contains("Hello & welcome"));
        assert!(!text.contains("bad()"));
        assert!(!text.contains("menu"));
        assert!(!text.contains("fine print"));
    }

    #[cfg(feature = "dom")]
    #[test]
    fn test_dom_tier_extracts_text_nodes() {
        let text = DomExtractor.convert(PAGE, "https://example.com").unwrap();
        assert!(text.contains("Heading"));
        assert!(text.contains("Hello & welcome"));
        assert!(!text.contains("bad()"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("menu"));
    }

    #[cfg(feature = "dom")]
    #[test]
    fn test_dom_tier_strips_aside_and_noscript() {
        let html = "<body><aside>ads</aside><noscript>enable js</noscript><p>Body</p></body>";
        let text = DomExtractor.convert(html, "").unwrap();
        assert_eq!(text, "Body");
    }

    #[test]
    fn test_regex_tier_strips_scripts_and_decodes_entities() {
        let text = RegexStripper
            .convert("<script>bad()</script><p>Hello</p>", "")
            .unwrap();
        assert!(text.contains("Hello"));
        assert!(!text.contains("bad()"));

        let text = RegexStripper.convert(PAGE, "").unwrap();
        assert!(text.contains("Hello & welcome"));
        assert!(!text.contains("color: red"));
    }

    #[test]
    fn test_regex_tier_handles_multiline_scripts() {
        let html = "<SCRIPT type=\"text/javascript\">\nvar x = 1;\nbad();\n</SCRIPT>ok";
        let text = RegexStripper.convert(html, "").unwrap();
        assert_eq!(text, "ok");
    }

    #[test]
    fn test_regex_tier_collapses_whitespace() {
        let text = RegexStripper
            .convert("a  \t b\n\n\n\n<p>c</p>", "")
            .unwrap();
        assert!(text.starts_with("a b"));
        assert!(text.contains("\n\n"));
        assert!(!text.contains("\n\n\n"));
    }
}
