//! URL handling module for Webmark
//!
//! This module provides URL normalization for deduplication and the scope
//! filter that bounds a crawl to one origin and path prefix.

mod normalize;
mod scope;

// Re-export main functions
pub use normalize::normalize_url;
pub use scope::ScopeFilter;
