//! Crawler module for page conversion and site traversal
//!
//! This module contains the core crawling logic, including:
//! - Breadth-first crawl orchestration and bulk conversion
//! - The frontier queue and visited set
//! - HTTP fetching and HTML parsing
//! - The page-to-Markdown conversion pipeline

mod converter;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod pipeline;
mod result;

pub use converter::{ConvertedPage, Converter, PageMetadata};
pub use coordinator::{crawl, crawl_urls, Crawler};
pub use fetcher::{build_http_client, fetch_html, FetchedPage};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::{parse_html, ParsedPage};
pub use pipeline::{PageConverter, PostProcess};
pub use result::{CrawlResult, FailedUrl};
