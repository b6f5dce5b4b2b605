use serde::Serialize;

/// A URL whose conversion failed, with the rendered error chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedUrl {
    pub url: String,
    pub error: String,
}

/// Outcome of a crawl or bulk conversion
///
/// The three lists are disjoint. Order within each list follows batch order
/// but carries no meaning beyond that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlResult {
    /// URLs converted and written to disk
    pub succeeded: Vec<String>,

    /// URLs whose conversion or write failed
    pub failed: Vec<FailedUrl>,

    /// Discovered links rejected by the scope filter
    pub skipped: Vec<String>,
}

impl CrawlResult {
    /// Returns true when no URL failed
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of URLs handed to the converter
    pub fn processed(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}
