//! HTTP fetcher implementation
//!
//! This module handles page downloads for the converter, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - GET requests that follow redirects
//! - Rejecting non-HTML responses and error statuses

use crate::config::FetchConfig;
use crate::FetchError;
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Maximum redirect hops before a fetch is abandoned
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Content-Type header value (empty if absent)
    pub content_type: String,

    /// Page body
    pub body: String,
}

/// Builds an HTTP client for page fetches
///
/// # Arguments
///
/// * `config` - User agent and request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use webmark::config::FetchConfig;
/// use webmark::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its HTML
///
/// A response without a Content-Type header is assumed to be HTML.
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Connection failure, timeout, redirect loop | `FetchError::Network` |
/// | Non-2xx status | `FetchError::Status` |
/// | Content-Type other than HTML | `FetchError::NotHtml` |
pub async fn fetch_html(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    let network = |source| FetchError::Network {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(network)?;
    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html(&content_type) {
        return Err(FetchError::NotHtml {
            url: url.to_string(),
            content_type,
        });
    }

    let body = response.text().await.map_err(network)?;
    tracing::debug!("Fetched {} ({} bytes)", final_url, body.len());

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        content_type,
        body,
    })
}

fn is_html(content_type: &str) -> bool {
    content_type.is_empty()
        || content_type.contains("text/html")
        || content_type.contains("application/xhtml+xml")
}
