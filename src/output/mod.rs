//! Output module for persisting converted pages
//!
//! This module handles:
//! - Mapping URLs to output file paths
//! - Writing Markdown documents to disk
//! - Assembling front matter for converted pages
//! - Rendering crawl summaries

mod markdown;
mod path;
mod summary;
mod writer;

pub use markdown::{compose_document, format_front_matter};
pub use path::{fnv1a_32, resolve_output_path};
pub use summary::{format_crawl_summary, print_crawl_summary};
pub use writer::MarkdownWriter;
