//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the batch loop that drives a crawl:
//! - Seeding the frontier with the start URL
//! - Converting one batch of URLs concurrently, bounded by the policy
//! - Folding the settled results into succeeded / failed lists
//! - Deduplicating and scope-filtering discovered links for the next depth
//!
//! Batches run strictly one after another. The frontier and visited set are
//! only touched between batches, so the conversions never share state.

use crate::config::CrawlPolicy;
use crate::crawler::converter::Converter;
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::result::{CrawlResult, FailedUrl};
use crate::output::MarkdownWriter;
use crate::url::{normalize_url, ScopeFilter};
use crate::UrlError;
use anyhow::Context;
use futures::future::join_all;
use std::time::Instant;

/// Main crawler structure
///
/// Owns the policy and the conversion function; every call to
/// [`Crawler::crawl`] or [`Crawler::crawl_urls`] gets its own frontier and
/// visited set.
pub struct Crawler<C> {
    policy: CrawlPolicy,
    converter: C,
    writer: MarkdownWriter,
}

impl<C: Converter> Crawler<C> {
    /// Creates a new crawler
    ///
    /// # Arguments
    ///
    /// * `converter` - Turns one URL into Markdown plus metadata
    /// * `policy` - Depth, scope, concurrency and output settings
    pub fn new(converter: C, policy: CrawlPolicy) -> Self {
        let writer = MarkdownWriter::new(policy.output_dir());
        Self {
            policy,
            converter,
            writer,
        }
    }

    pub fn policy(&self) -> &CrawlPolicy {
        &self.policy
    }

    /// Crawls the site breadth-first from `start_url`
    ///
    /// Every in-scope page up to `max_link_depth` hops away is converted once
    /// and written under the output directory. A page at the maximum depth is
    /// still converted, but its links are not looked at.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - The crawl ran to completion (individual pages may have failed)
    /// * `Err(UrlError)` - The start URL is not a valid http(s) URL; nothing was converted
    pub async fn crawl(&self, start_url: &str) -> Result<CrawlResult, UrlError> {
        let scope = ScopeFilter::from_policy(start_url, &self.policy)?;
        let max_link_depth = self.policy.max_link_depth();

        let mut frontier = Frontier::new();
        frontier.mark_visited(normalize_url(start_url));
        frontier.push(start_url, 0);

        let mut result = CrawlResult::default();
        let mut processed = 0usize;
        let start_time = Instant::now();

        tracing::debug!(
            "Crawl settings: max_link_depth={}, max_path_depth={:?}, concurrency={}, scope_levels={}, prefix={}",
            max_link_depth,
            self.policy.max_path_depth(),
            self.policy.concurrency(),
            self.policy.scope_levels(),
            scope.prefix()
        );

        while !frontier.is_empty() {
            let batch = frontier.next_batch(self.policy.concurrency());
            tracing::debug!(
                "Batch started: {} URLs, {} still queued",
                batch.len(),
                frontier.len()
            );

            let outcomes = join_all(batch.iter().map(|entry| {
                processed += 1;
                let number = processed;
                async move {
                    tracing::info!(
                        "Crawling #{} (depth {}/{}): {}",
                        number,
                        entry.depth,
                        max_link_depth,
                        entry.url
                    );
                    self.convert_and_save(&entry.url).await
                }
            }))
            .await;

            for (entry, outcome) in batch.into_iter().zip(outcomes) {
                match outcome {
                    Ok(links) => {
                        result.succeeded.push(entry.url.clone());

                        if entry.depth < max_link_depth {
                            self.collect_links(&entry, &links, &scope, &mut frontier, &mut result);
                        } else {
                            tracing::debug!(
                                "Max link depth reached, not collecting links from {}",
                                entry.url
                            );
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Crawl failed: {} - {:#}", entry.url, e);
                        result.failed.push(FailedUrl {
                            url: entry.url,
                            error: format!("{:#}", e),
                        });
                    }
                }
            }

            tracing::debug!(
                "Batch finished: {} succeeded, {} failed, {} queued",
                result.succeeded.len(),
                result.failed.len(),
                frontier.len()
            );
        }

        tracing::info!(
            "Crawl completed: {} succeeded, {} failed, {} skipped, {} unique URLs seen in {:?}",
            result.succeeded.len(),
            result.failed.len(),
            result.skipped.len(),
            frontier.visited_count(),
            start_time.elapsed()
        );

        Ok(result)
    }

    /// Converts a fixed list of URLs without following any links
    ///
    /// URLs are processed in list order, `concurrency` at a time. The
    /// `skipped` list of the result is always empty.
    pub async fn crawl_urls(&self, urls: &[String]) -> CrawlResult {
        let mut result = CrawlResult::default();
        let total = urls.len();
        let mut processed = 0usize;

        for batch in urls.chunks(self.policy.concurrency()) {
            let outcomes = join_all(batch.iter().map(|url| {
                processed += 1;
                let number = processed;
                async move {
                    tracing::info!("Converting #{}/{}: {}", number, total, url);
                    self.convert_and_save(url).await
                }
            }))
            .await;

            for (url, outcome) in batch.iter().zip(outcomes) {
                match outcome {
                    Ok(_) => result.succeeded.push(url.clone()),
                    Err(e) => {
                        tracing::warn!("Conversion failed: {} - {:#}", url, e);
                        result.failed.push(FailedUrl {
                            url: url.clone(),
                            error: format!("{:#}", e),
                        });
                    }
                }
            }
        }

        tracing::info!(
            "Conversion completed: {} succeeded, {} failed",
            result.succeeded.len(),
            result.failed.len()
        );

        result
    }

    /// Converts one URL and writes the document, returning the page's links
    async fn convert_and_save(&self, url: &str) -> anyhow::Result<Vec<String>> {
        let page = self.converter.convert(url).await?;
        self.writer
            .write(url, &page.markdown)
            .await
            .with_context(|| format!("failed to save {}", url))?;
        Ok(page.metadata.links)
    }

    /// Queues the unseen, in-scope links of a converted page
    fn collect_links(
        &self,
        entry: &FrontierEntry,
        links: &[String],
        scope: &ScopeFilter,
        frontier: &mut Frontier,
        result: &mut CrawlResult,
    ) {
        let mut added = 0;
        let mut duplicated = 0;
        let mut out_of_scope = 0;

        for link in links {
            if !frontier.mark_visited(normalize_url(link)) {
                duplicated += 1;
                continue;
            }

            if !scope.is_in_scope(link) {
                result.skipped.push(link.clone());
                out_of_scope += 1;
                continue;
            }

            frontier.push(link.clone(), entry.depth + 1);
            added += 1;
        }

        tracing::debug!(
            "Links on {}: found {}, added {}, duplicate {}, out of scope {}",
            entry.url,
            links.len(),
            added,
            duplicated,
            out_of_scope
        );
    }
}

/// Crawls the site reachable from `start_url` with the given converter
///
/// # Example
///
/// ```no_run
/// use webmark::config::CrawlPolicy;
/// use webmark::crawler::{crawl, PageConverter};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let policy = CrawlPolicy::builder("./out").max_link_depth(2).build()?;
/// let converter = PageConverter::new(reqwest::Client::new());
/// let result = crawl("https://example.com/docs/intro", &policy, converter).await?;
/// println!("{} pages converted", result.succeeded.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl<C: Converter>(
    start_url: &str,
    policy: &CrawlPolicy,
    converter: C,
) -> Result<CrawlResult, UrlError> {
    Crawler::new(converter, policy.clone()).crawl(start_url).await
}

/// Converts each URL in `urls` once, following no links
pub async fn crawl_urls<C: Converter>(
    urls: &[String],
    policy: &CrawlPolicy,
    converter: C,
) -> CrawlResult {
    Crawler::new(converter, policy.clone()).crawl_urls(urls).await
}
