//! Human-readable crawl summaries
//!
//! Renders a [`CrawlResult`] as success / failure / skip counts for the CLI.

use crate::crawler::CrawlResult;

/// Formats a crawl result for display
///
/// Failed URLs are always listed with their errors. Skipped URLs are only
/// listed when `list_skipped` is set, since a wide site can produce many.
pub fn format_crawl_summary(result: &CrawlResult, list_skipped: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!("Processed: {}\n", result.processed()));
    out.push_str(&format!("Succeeded: {}\n", result.succeeded.len()));

    if !result.failed.is_empty() {
        out.push_str(&format!("Failed: {}\n", result.failed.len()));
        for failure in &result.failed {
            out.push_str(&format!("  - {}: {}\n", failure.url, failure.error));
        }
    }

    if !result.skipped.is_empty() {
        out.push_str(&format!("Skipped (out of scope): {}\n", result.skipped.len()));
        if list_skipped {
            for url in &result.skipped {
                out.push_str(&format!("  - {}\n", url));
            }
        }
    }

    out
}

/// Prints a crawl result summary to stderr
pub fn print_crawl_summary(result: &CrawlResult, list_skipped: bool) {
    eprint!("\n{}", format_crawl_summary(result, list_skipped));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::FailedUrl;

    fn sample() -> CrawlResult {
        CrawlResult {
            succeeded: vec!["https://example.com/a".to_string()],
            failed: vec![FailedUrl {
                url: "https://example.com/b".to_string(),
                error: "HTTP 500".to_string(),
            }],
            skipped: vec!["https://other.com/".to_string()],
        }
    }

    #[test]
    fn test_summary_counts() {
        let text = format_crawl_summary(&sample(), false);
        assert!(text.contains("Processed: 2"));
        assert!(text.contains("Succeeded: 1"));
        assert!(text.contains("Failed: 1"));
        assert!(text.contains("  - https://example.com/b: HTTP 500"));
        assert!(text.contains("Skipped (out of scope): 1"));
        assert!(!text.contains("https://other.com/"));
    }

    #[test]
    fn test_summary_lists_skipped_on_request() {
        let text = format_crawl_summary(&sample(), true);
        assert!(text.contains("  - https://other.com/"));
    }

    #[test]
    fn test_summary_omits_empty_sections() {
        let text = format_crawl_summary(&CrawlResult::default(), false);
        assert_eq!(text, "Processed: 0\nSucceeded: 0\n");
    }
}
