//! Conversion boundary between the orchestrator and page processing
//!
//! The orchestrator only ever sees [`Converter::convert`]. What happens behind
//! it (fetching, rendering, Markdown conversion, LLM post-processing) is the
//! implementation's business, and any failure is reported through
//! `anyhow::Error`.

use serde::Serialize;
use std::future::Future;

/// Metadata describing a converted page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    /// The URL that was converted
    pub url: String,

    /// Serialized origin (`scheme://host[:port]`)
    pub origin: String,

    /// URL path
    pub pathname: String,

    /// Page title, empty if the page has none
    pub title: String,

    /// `<meta name="description">` content
    pub description: Option<String>,

    /// `<meta property="og:image">` content
    pub og_image: Option<String>,

    /// Absolute http(s) links found on the page, fragment-free and deduplicated
    pub links: Vec<String>,
}

/// Result of converting one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertedPage {
    pub markdown: String,
    pub metadata: PageMetadata,
}

/// Converts one URL into Markdown plus page metadata
///
/// Any async closure `Fn(String) -> Future<Output = anyhow::Result<ConvertedPage>>`
/// is a converter, which keeps tests and embedders free of boilerplate.
pub trait Converter {
    fn convert(&self, url: &str) -> impl Future<Output = anyhow::Result<ConvertedPage>> + Send;
}

impl<F, Fut> Converter for F
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = anyhow::Result<ConvertedPage>> + Send,
{
    fn convert(&self, url: &str) -> impl Future<Output = anyhow::Result<ConvertedPage>> + Send {
        (self)(url.to_string())
    }
}
