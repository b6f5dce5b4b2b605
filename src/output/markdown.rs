//! Markdown document assembly
//!
//! Converted pages start with a YAML front matter block carrying the page
//! metadata, followed by the converted body.

use crate::crawler::PageMetadata;
use chrono::{DateTime, SecondsFormat, Utc};

/// Formats the YAML front matter block for a page
///
/// Empty fields are left out. Values are always double-quoted.
///
/// # Arguments
///
/// * `metadata` - The page metadata
/// * `created_at` - Conversion timestamp
///
/// # Returns
///
/// The front matter, including both `---` fences and a trailing blank line
pub fn format_front_matter(metadata: &PageMetadata, created_at: DateTime<Utc>) -> String {
    let created = created_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    let entries: [(&str, Option<&str>); 5] = [
        ("title", Some(metadata.title.as_str())),
        ("description", metadata.description.as_deref()),
        ("og_image", metadata.og_image.as_deref()),
        ("url", Some(metadata.url.as_str())),
        ("created_at", Some(created.as_str())),
    ];

    let mut md = String::from("---\n");
    for (key, value) in entries {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            md.push_str(&format!("{}: \"{}\"\n", key, escape_yaml(value)));
        }
    }
    md.push_str("---\n\n");
    md
}

/// Joins front matter and body into the final document
pub fn compose_document(metadata: &PageMetadata, body: &str, created_at: DateTime<Utc>) -> String {
    let mut md = format_front_matter(metadata, created_at);
    md.push_str(body.trim());
    md.push('\n');
    md
}

fn escape_yaml(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', " ")
}
