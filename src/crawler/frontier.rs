//! Breadth-first frontier and visited set
//!
//! This module handles:
//! - FIFO queueing of discovered URLs with their link depth
//! - Batch dequeueing bounded by the crawl's concurrency
//! - Tracking which normalized URLs have already been seen

use std::collections::{HashSet, VecDeque};

/// A URL waiting to be converted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The URL as it was discovered
    pub url: String,

    /// Link hops from the start URL
    pub depth: u32,
}

/// Queue of discovered-but-unprocessed URLs plus the visited set
///
/// Entries are dequeued in insertion order. Since every entry at depth `d + 1`
/// is discovered while processing depth `d`, FIFO order is breadth-first order.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a URL to the back of the queue
    pub fn push(&mut self, url: impl Into<String>, depth: u32) {
        self.queue.push_back(FrontierEntry {
            url: url.into(),
            depth,
        });
    }

    /// Removes up to `size` entries from the front of the queue
    pub fn next_batch(&mut self, size: usize) -> Vec<FrontierEntry> {
        let take = size.min(self.queue.len());
        self.queue.drain(..take).collect()
    }

    /// Records a normalized URL as seen
    ///
    /// # Returns
    ///
    /// `true` if the URL was new, `false` if it had already been seen
    pub fn mark_visited(&mut self, normalized: impl Into<String>) -> bool {
        self.visited.insert(normalized.into())
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
