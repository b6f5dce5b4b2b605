//! Output path resolution
//!
//! Maps a page URL to the Markdown file it is written to. The mapping is
//! deterministic: the same URL always lands on the same file, whatever order
//! its query parameters were written in, and URLs that differ in any query
//! value land on different files.

use crate::UrlError;
use std::path::{Path, PathBuf};
use url::form_urlencoded;
use url::Url;

/// Longest query slug kept in a file name
const MAX_SLUG_LEN: usize = 80;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Resolves the output file for a URL under `output_dir`
///
/// # Rules
///
/// - A trailing slash is dropped; the root path becomes `index`
/// - An extension on the last segment is replaced with `.md`, otherwise `.md` is appended
/// - Query parameters are sorted by `(key, value)` and encoded as
///   `__<slug>__h<fnv1a>` before the extension
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use webmark::output::resolve_output_path;
///
/// let path = resolve_output_path(Path::new("/out"), "https://example.com/docs/api/").unwrap();
/// assert_eq!(path, Path::new("/out/docs/api.md"));
///
/// let a = resolve_output_path(Path::new("/out"), "https://example.com/s?b=2&a=1").unwrap();
/// let b = resolve_output_path(Path::new("/out"), "https://example.com/s?a=1&b=2").unwrap();
/// assert_eq!(a, b);
/// ```
pub fn resolve_output_path(output_dir: &Path, url: &str) -> Result<PathBuf, UrlError> {
    let parsed = Url::parse(url).map_err(|e| UrlError::Parse(format!("{}: {}", url, e)))?;

    let base = base_path(parsed.path());

    let mut pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.sort();

    let relative = if pairs.is_empty() {
        format!("{}.md", base)
    } else {
        let hash = fnv1a_32(canonical_query(&pairs).as_bytes());
        let slug = query_slug(&pairs);
        if slug.is_empty() {
            format!("{}__h{:08x}.md", base, hash)
        } else {
            format!("{}__{}__h{:08x}.md", base, slug, hash)
        }
    };

    Ok(output_dir.join(relative.trim_start_matches('/')))
}

/// 32-bit FNV-1a hash
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// URL path without trailing slash or extension, rooted at `/`
fn base_path(path: &str) -> String {
    let path = path.strip_suffix('/').unwrap_or(path);
    if path.is_empty() {
        return "/index".to_string();
    }

    let last_segment = path.rsplit('/').next().unwrap_or(path);
    match last_segment.rfind('.') {
        // A leading dot names a hidden file, not an extension
        Some(dot) if dot > 0 => {
            let extension_len = last_segment.len() - dot;
            path[..path.len() - extension_len].to_string()
        }
        _ => path.to_string(),
    }
}

/// Percent-encoded `key=value&...` form of the sorted parameters
fn canonical_query(pairs: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Filename-safe summary of the sorted parameters
fn query_slug(pairs: &[(String, String)]) -> String {
    let mut slug = pairs
        .iter()
        .filter_map(|(key, value)| {
            let key = slugify(key);
            let value = slugify(value);
            match (key.is_empty(), value.is_empty()) {
                (true, true) => None,
                (false, true) => Some(key),
                (true, false) => Some(value),
                (false, false) => Some(format!("{}-{}", key, value)),
            }
        })
        .collect::<Vec<_>>()
        .join("_");

    // Slugs are pure ASCII, so byte truncation never splits a character
    slug.truncate(MAX_SLUG_LEN);
    slug.trim_end_matches(['-', '_']).to_string()
}

/// Lowercases and collapses every non-alphanumeric run into one hyphen
fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_separator = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(c);
        } else {
            pending_separator = true;
        }
    }

    out
}
