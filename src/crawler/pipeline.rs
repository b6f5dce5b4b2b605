//! Page conversion pipeline
//!
//! [`PageConverter`] is the converter used by the CLI: it downloads a page,
//! isolates the main content, converts it to Markdown with front matter, and
//! optionally hands the document to the completion service for cleanup and
//! translation.

use crate::crawler::converter::{ConvertedPage, Converter, PageMetadata};
use crate::crawler::fetcher::fetch_html;
use crate::crawler::parser::parse_html;
use crate::llm::LlmClient;
use crate::output::compose_document;
use crate::UrlError;
use anyhow::Context;
use chrono::Utc;
use reqwest::Client;
use std::future::Future;
use url::Url;

/// LLM post-processing applied after conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostProcess {
    /// Remove page chrome the HTML filter missed
    pub refine: bool,

    /// Translate the document into this language
    pub translate_to: Option<String>,
}

impl PostProcess {
    pub fn is_empty(&self) -> bool {
        !self.refine && self.translate_to.is_none()
    }
}

/// Converts web pages to Markdown documents
#[derive(Debug, Clone)]
pub struct PageConverter {
    http: Client,
    llm: Option<LlmClient>,
    post: PostProcess,
}

impl PageConverter {
    /// Creates a converter without LLM post-processing
    pub fn new(http: Client) -> Self {
        Self {
            http,
            llm: None,
            post: PostProcess::default(),
        }
    }

    /// Enables LLM post-processing through `llm`
    pub fn with_llm(mut self, llm: LlmClient, post: PostProcess) -> Self {
        self.llm = Some(llm);
        self.post = post;
        self
    }

    /// Converts one page
    ///
    /// # Pipeline
    ///
    /// 1. Validate the URL (http or https only)
    /// 2. Fetch the HTML
    /// 3. Parse metadata and links, isolate the main content
    /// 4. Convert the content to Markdown and prepend front matter
    /// 5. Refine, then translate, when enabled
    pub async fn convert_page(&self, url: &str) -> anyhow::Result<ConvertedPage> {
        let parsed_url = validate_url(url)?;

        let fetched = fetch_html(&self.http, parsed_url.as_str()).await?;
        let base_url = Url::parse(&fetched.final_url).unwrap_or(parsed_url);

        let mut page = render_page(&fetched.body, &base_url);
        tracing::debug!(
            "Converted {} to Markdown ({} chars, {} links)",
            base_url,
            page.markdown.chars().count(),
            page.metadata.links.len()
        );

        if let Some(llm) = &self.llm {
            if self.post.refine {
                page.markdown = llm
                    .refine(&page.markdown)
                    .await
                    .context("LLM refine failed")?;
            }

            if let Some(lang) = &self.post.translate_to {
                page.markdown = llm
                    .translate(&page.markdown, lang)
                    .await
                    .with_context(|| format!("LLM translation to {} failed", lang))?;
            }
        }

        Ok(page)
    }
}

impl Converter for PageConverter {
    fn convert(&self, url: &str) -> impl Future<Output = anyhow::Result<ConvertedPage>> + Send {
        self.convert_page(url)
    }
}

/// Rejects anything that is not an absolute http(s) URL
fn validate_url(url: &str) -> Result<Url, UrlError> {
    let parsed = Url::parse(url).map_err(|e| UrlError::Parse(format!("{}: {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            other
        ))),
    }
}

/// Builds the Markdown document and metadata for fetched HTML
///
/// Kept synchronous so the parsed DOM never lives across an await point.
fn render_page(html: &str, base_url: &Url) -> ConvertedPage {
    let parsed = parse_html(html, base_url);

    let metadata = PageMetadata {
        url: base_url.to_string(),
        origin: base_url.origin().ascii_serialization(),
        pathname: base_url.path().to_string(),
        title: parsed.title.unwrap_or_default(),
        description: parsed.description,
        og_image: parsed.og_image,
        links: parsed.links,
    };

    let body = html2md::parse_html(&parsed.content_html);
    let markdown = compose_document(&metadata, &body, Utc::now());

    ConvertedPage { markdown, metadata }
}
