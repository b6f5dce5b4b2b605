//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small documentation site and run the
//! real page converter against it end-to-end, writing into a temp directory.

use tempfile::TempDir;
use webmark::config::CrawlPolicy;
use webmark::crawler::{crawl, crawl_urls, PageConverter};
use webmark::output::resolve_output_path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, title: &str, body: &str) {
    let html = format!(
        r#"<html><head><title>{}</title></head><body>{}</body></html>"#,
        title, body
    );

    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

/// Serves a docs section with in-scope, out-of-scope, duplicate and broken links
async fn docs_site() -> MockServer {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/docs/intro",
        "Intro",
        &format!(
            r##"<nav><a href="/docs/intro#top">Top</a><a href="/blog/post">Blog</a></nav>
            <main>
                <h1>Welcome</h1>
                <p>Read the <a href="/docs/guide">guide</a> and the
                <a href="{base}/docs/api?v=2&amp;lang=en">API</a>.</p>
                <p>See also <a href="https://other.example/page">elsewhere</a>
                and <a href="/docs/missing">a broken page</a>.</p>
            </main>"##
        ),
    )
    .await;

    mount_page(
        &server,
        "/docs/guide",
        "Guide",
        r#"<main><h1>Guide</h1>
            <p>Back to <a href="/docs/intro/">intro</a>,
            deeper in <a href="/docs/deep">deep</a>.</p></main>"#,
    )
    .await;

    mount_page(
        &server,
        "/docs/api",
        "API",
        r#"<article><h1>API reference</h1><p>Endpoints.</p></article>"#,
    )
    .await;

    mount_page(
        &server,
        "/docs/deep",
        "Deep",
        r#"<main><p>Should never be fetched at depth 1.</p></main>"#,
    )
    .await;

    server
}

fn sorted(mut urls: Vec<String>) -> Vec<String> {
    urls.sort();
    urls
}

#[tokio::test]
async fn test_full_crawl_of_docs_section() {
    let server = docs_site().await;
    let base = server.uri();
    let out = TempDir::new().unwrap();

    let policy = CrawlPolicy::builder(out.path())
        .max_link_depth(1)
        .concurrency(2)
        .build()
        .unwrap();

    let result = crawl(
        &format!("{}/docs/intro", base),
        &policy,
        PageConverter::new(reqwest::Client::new()),
    )
    .await
    .unwrap();

    assert_eq!(
        sorted(result.succeeded.clone()),
        sorted(vec![
            format!("{}/docs/api?v=2&lang=en", base),
            format!("{}/docs/guide", base),
            format!("{}/docs/intro", base),
        ])
    );

    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].url, format!("{}/docs/missing", base));
    assert!(result.failed[0].error.contains("404"));

    assert_eq!(
        sorted(result.skipped.clone()),
        sorted(vec![
            format!("{}/blog/post", base),
            "https://other.example/page".to_string(),
        ])
    );

    // Depth-1 pages do not have their links followed
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/docs/deep"));
    let intro_fetches = requests
        .iter()
        .filter(|r| r.url.path() == "/docs/intro")
        .count();
    assert_eq!(intro_fetches, 1);

    // One document per successful page
    let intro = std::fs::read_to_string(out.path().join("docs/intro.md")).unwrap();
    assert!(intro.starts_with("---\ntitle: \"Intro\"\n"));
    assert!(intro.contains("Welcome"));
    assert!(!intro.contains("Blog"));

    let api_path =
        resolve_output_path(out.path(), &format!("{}/docs/api?v=2&lang=en", base)).unwrap();
    let api = std::fs::read_to_string(api_path).unwrap();
    assert!(api.contains("API reference"));

    assert!(out.path().join("docs/guide.md").exists());
    assert!(!out.path().join("docs/missing.md").exists());
}

#[tokio::test]
async fn test_bulk_conversion_follows_no_links() {
    let server = docs_site().await;
    let base = server.uri();
    let out = TempDir::new().unwrap();

    let policy = CrawlPolicy::builder(out.path()).concurrency(3).build().unwrap();
    let urls = vec![
        format!("{}/docs/guide", base),
        format!("{}/docs/api", base),
        format!("{}/docs/missing", base),
    ];

    let result = crawl_urls(&urls, &policy, PageConverter::new(reqwest::Client::new())).await;

    assert_eq!(
        result.succeeded,
        vec![format!("{}/docs/guide", base), format!("{}/docs/api", base)]
    );
    assert_eq!(result.failed.len(), 1);
    assert!(result.skipped.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);

    let guide = std::fs::read_to_string(out.path().join("docs/guide.md")).unwrap();
    assert!(guide.contains("title: \"Guide\""));
    assert!(guide.contains("created_at: \""));
}

#[tokio::test]
async fn test_non_html_page_recorded_as_failure() {
    let server = MockServer::start().await;
    let base = server.uri();
    let out = TempDir::new().unwrap();

    mount_page(
        &server,
        "/files/index",
        "Files",
        r#"<main><a href="/files/report.pdf">Report</a></main>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/files/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.4", "application/pdf"))
        .mount(&server)
        .await;

    let policy = CrawlPolicy::builder(out.path()).build().unwrap();
    let result = crawl(
        &format!("{}/files/index", base),
        &policy,
        PageConverter::new(reqwest::Client::new()),
    )
    .await
    .unwrap();

    assert_eq!(result.succeeded, vec![format!("{}/files/index", base)]);
    assert_eq!(result.failed.len(), 1);
    assert!(result.failed[0].error.contains("application/pdf"));
}
