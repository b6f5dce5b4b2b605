//! Webmark: web pages to Markdown
//!
//! This crate converts web pages into Markdown documents. A single page can be
//! converted on its own, a fixed list of pages can be converted in bulk, or a
//! site's link graph can be traversed breadth-first within a scope boundary.

pub mod config;
pub mod crawler;
pub mod llm;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Webmark operations
#[derive(Debug, Error)]
pub enum WebmarkError {
    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Page download errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    NotHtml { url: String, content_type: String },
}

/// Errors raised while talking to the completion service
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM configuration missing: {0}")]
    MissingConfig(String),

    #[error("Request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("LLM API error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode LLM response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to read response stream: {0}")]
    Stream(String),

    #[error("Request body cannot be retried")]
    UnclonableRequest,
}

/// Result type alias for Webmark operations
pub type Result<T> = std::result::Result<T, WebmarkError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

/// Result type alias for completion-service operations
pub type LlmResult<T> = std::result::Result<T, LlmError>;

// Re-export commonly used types
pub use config::{CrawlPolicy, RetryPolicy};
pub use crawler::{crawl, crawl_urls, ConvertedPage, Converter, CrawlResult, Crawler};
pub use output::resolve_output_path;
pub use url::{normalize_url, ScopeFilter};
