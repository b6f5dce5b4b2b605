use url::Url;

/// Index document names that address the same page as their directory
const INDEX_SUFFIXES: &[&str] = &["/index.html", "/index.htm"];

/// Normalizes a URL into a deduplication key
///
/// # Normalization Steps
///
/// 1. Parse the URL; malformed input is returned unchanged
/// 2. Lowercase the host
/// 3. Remove default ports (80 for http, 443 for https)
/// 4. Remove a trailing `/index.html` or `/index.htm`
/// 5. Remove trailing slashes (except for root /)
/// 6. Keep the query string and fragment verbatim
///
/// The result is only ever used to compare URLs. It is never fetched and never
/// used for scope decisions.
///
/// # Examples
///
/// ```
/// use webmark::url::normalize_url;
///
/// assert_eq!(
///     normalize_url("https://EXAMPLE.COM:443/docs/index.html"),
///     "https://example.com/docs"
/// );
/// assert_eq!(normalize_url("not a url"), "not a url");
/// ```
pub fn normalize_url(url_str: &str) -> String {
    let mut url = match Url::parse(url_str) {
        Ok(url) => url,
        Err(_) => return url_str.to_string(),
    };

    if url.cannot_be_a_base() {
        return url.to_string();
    }

    let lowered_host = url.host_str().map(str::to_lowercase);
    if let Some(host) = lowered_host {
        if url.set_host(Some(&host)).is_err() {
            return url_str.to_string();
        }
    }

    if matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    ) {
        // Only fails for hosts that cannot carry a port, which this one already does
        let _ = url.set_port(None);
    }

    let path = normalize_path(url.path());
    url.set_path(&path);

    url.to_string()
}

/// Strips index documents and trailing slashes until the path stops changing
fn normalize_path(path: &str) -> String {
    let mut current = path;

    loop {
        let trimmed = strip_index_suffix(current).trim_end_matches('/');
        if trimmed.len() == current.len() {
            break;
        }
        current = trimmed;
    }

    if current.is_empty() {
        "/".to_string()
    } else {
        current.to_string()
    }
}

fn strip_index_suffix(path: &str) -> &str {
    INDEX_SUFFIXES
        .iter()
        .find_map(|suffix| path.strip_suffix(suffix))
        .unwrap_or(path)
}
