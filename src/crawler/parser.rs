//! HTML parser for extracting links, metadata and main content
//!
//! This module handles parsing fetched HTML to extract:
//! - Links to follow (from `<a>` tags)
//! - Page title, description and `og:image`
//! - The main content fragment, with page chrome removed

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements removed before the content is converted to Markdown
const STRIPPED_ELEMENTS: &str = "script, style, noscript, template, link, svg, figure, \
nav, footer, aside, form, fieldset, input, textarea, select, button, object, embed, iframe, \
[hidden], [aria-hidden=\"true\"], [style*=\"display:none\"], [style*=\"display: none\"]";

/// Candidates for the main content container, tried in order
const MAIN_CONTENT_SELECTORS: [&str; 4] = ["main", "article", "[role=\"main\"]", "body"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from `<title>`)
    pub title: Option<String>,

    /// `<meta name="description">` content
    pub description: Option<String>,

    /// `<meta property="og:image">` content, resolved against the page URL
    pub og_image: Option<String>,

    /// Absolute http(s) links, fragment-free, in document order without duplicates
    pub links: Vec<String>,

    /// Inner HTML of the main content container, chrome removed
    pub content_html: String,
}

/// Parses HTML content and extracts links, metadata and main content
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document, including navigation
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
///
/// Links are collected before any element is stripped, so navigation menus
/// still feed the crawl even though they never reach the Markdown.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The base URL for resolving relative links
///
/// # Example
///
/// ```
/// use webmark::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page#top">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["https://example.com/page"]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let mut document = Html::parse_document(html);

    let title = extract_title(&document);
    let description = extract_meta(&document, "meta[name=\"description\"]");
    let og_image = extract_meta(&document, "meta[property=\"og:image\"]")
        .and_then(|src| base_url.join(&src).ok())
        .map(|url| url.to_string());
    let links = extract_links(&document, base_url);

    strip_elements(&mut document);
    let content_html = extract_main_content(&document);

    ParsedPage {
        title,
        description,
        og_image,
        links,
        content_html,
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Reads the trimmed `content` attribute of the first matching `<meta>`
fn extract_meta(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        if let Some(absolute_url) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, base_url))
        {
            if seen.insert(absolute_url.clone()) {
                links.push(absolute_url);
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL without its fragment
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only hrefs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }

    absolute_url.set_fragment(None);
    Some(absolute_url.to_string())
}

/// Detaches every element matching [`STRIPPED_ELEMENTS`] from the tree
fn strip_elements(document: &mut Html) {
    let Ok(selector) = Selector::parse(STRIPPED_ELEMENTS) else {
        return;
    };

    // Collect first: the tree cannot be mutated while a selection borrows it
    let ids: Vec<_> = document.select(&selector).map(|element| element.id()).collect();

    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Returns the inner HTML of the first non-empty main content candidate
fn extract_main_content(document: &Html) -> String {
    for candidate in MAIN_CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(candidate) else {
            continue;
        };

        if let Some(element) = document
            .select(&selector)
            .find(|element| element.text().any(|text| !text.trim().is_empty()))
        {
            return element.inner_html();
        }
    }

    document.root_element().inner_html()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    #[test]
    fn test_extract_title() {
        let html = r#"<html><head><title>  Test Page  </title></head><body></body></html>"#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.title, Some("Test Page".to_string()));
    }

    #[test]
    fn test_no_title() {
        let html = r#"<html><head></head><body></body></html>"#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.title, None);
    }

    #[test]
    fn test_extract_description_and_og_image() {
        let html = r#"
            <html><head>
                <meta name="description" content=" A short summary ">
                <meta property="og:image" content="/img/cover.png">
            </head><body></body></html>
        "#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.description, Some("A short summary".to_string()));
        assert_eq!(
            parsed.og_image,
            Some("https://example.com/img/cover.png".to_string())
        );
    }

    #[test]
    fn test_missing_meta() {
        let html = r#"<html><head><meta name="description" content=""></head></html>"#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.description, None);
        assert_eq!(parsed.og_image, None);
    }

    #[test]
    fn test_extract_relative_links() {
        let html = r#"<html><body><a href="/other">A</a><a href="sibling">B</a></body></html>"#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(
            parsed.links,
            vec!["https://example.com/other", "https://example.com/sibling"]
        );
    }

    #[test]
    fn test_links_deduplicated_without_fragments() {
        let html = r##"
            <html><body>
                <a href="/guide#install">Install</a>
                <a href="/guide#usage">Usage</a>
                <a href="/guide">Guide</a>
                <a href="https://other.com/page">Other</a>
            </body></html>
        "##;
        let parsed = parse_html(html, &base_url());
        assert_eq!(
            parsed.links,
            vec!["https://example.com/guide", "https://other.com/page"]
        );
    }

    #[test]
    fn test_skip_special_links() {
        let html = r##"
            <html><body>
                <a href="javascript:void(0)">JS</a>
                <a href="JavaScript:alert(1)">JS</a>
                <a href="mailto:test@example.com">Email</a>
                <a href="tel:+1234567890">Call</a>
                <a href="data:text/html,hi">Data</a>
                <a href="/file.pdf" download>Download</a>
                <a href="#section">Jump</a>
                <a href="ftp://example.com/file">FTP</a>
                <a href="/valid">Valid</a>
            </body></html>
        "##;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.links, vec!["https://example.com/valid"]);
    }

    #[test]
    fn test_nav_links_collected_but_stripped_from_content() {
        let html = r#"
            <html><body>
                <nav><a href="/docs/next">Next</a></nav>
                <main><h1>Hello</h1><p>Body text</p></main>
                <footer>Copyright</footer>
            </body></html>
        "#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.links, vec!["https://example.com/docs/next"]);
        assert!(parsed.content_html.contains("<h1>Hello</h1>"));
        assert!(!parsed.content_html.contains("Next"));
        assert!(!parsed.content_html.contains("Copyright"));
    }

    #[test]
    fn test_main_preferred_over_article() {
        let html = r#"
            <html><body>
                <div>Header noise</div>
                <article>Teaser</article>
                <main><p>Main body</p></main>
            </body></html>
        "#;
        let parsed = parse_html(html, &base_url());
        assert!(parsed.content_html.contains("Main body"));
        assert!(!parsed.content_html.contains("Header noise"));
        assert!(!parsed.content_html.contains("Teaser"));
    }

    #[test]
    fn test_article_then_role_main() {
        let article = r#"<html><body><div>x</div><article><p>Story</p></article></body></html>"#;
        let parsed = parse_html(article, &base_url());
        assert_eq!(parsed.content_html, "<p>Story</p>");

        let role = r#"<html><body><div>x</div><div role="main"><p>Role</p></div></body></html>"#;
        let parsed = parse_html(role, &base_url());
        assert_eq!(parsed.content_html, "<p>Role</p>");
    }

    #[test]
    fn test_body_fallback_strips_chrome() {
        let html = r#"
            <html><head><style>p { color: red; }</style></head><body>
                <script>var x = "<p>fake</p>";</script>
                <aside>Sidebar</aside>
                <form><input name="q"><button>Go</button></form>
                <div hidden>Hidden menu</div>
                <span aria-hidden="true">Icon label</span>
                <div style="color: gray; display:none">Collapsed modal</div>
                <div style="display: none">Closed drawer</div>
                <figure><svg><text>Chart</text></svg><figcaption>Caption</figcaption></figure>
                <p>Plain body</p>
            </body></html>
        "#;
        let parsed = parse_html(html, &base_url());
        assert!(parsed.content_html.contains("<p>Plain body</p>"));
        assert!(!parsed.content_html.contains("fake"));
        assert!(!parsed.content_html.contains("Sidebar"));
        assert!(!parsed.content_html.contains("Go"));
        assert!(!parsed.content_html.contains("color"));
        assert!(!parsed.content_html.contains("Hidden menu"));
        assert!(!parsed.content_html.contains("Icon label"));
        assert!(!parsed.content_html.contains("Collapsed modal"));
        assert!(!parsed.content_html.contains("Closed drawer"));
        assert!(!parsed.content_html.contains("Chart"));
        assert!(!parsed.content_html.contains("Caption"));
    }

    #[test]
    fn test_hidden_elements_stripped_inside_main() {
        let html = r#"<html><body><main><p>Visible</p><div hidden>HiddenDiv</div><div aria-hidden="true">AriaHidden</div></main></body></html>"#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.content_html, "<p>Visible</p>");
    }

    #[test]
    fn test_empty_main_falls_through() {
        let html = r#"<html><body><main>  </main><article><p>Real</p></article></body></html>"#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.content_html, "<p>Real</p>");
    }
}
