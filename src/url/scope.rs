use crate::config::CrawlPolicy;
use crate::UrlError;
use url::{Origin, Url};

/// Decides whether a discovered URL belongs to the crawl
///
/// The boundary is an `(origin, path prefix)` pair derived once from the start
/// URL. After construction every decision is a pure function of the candidate
/// URL, the boundary and the optional path-depth bound.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    origin: Origin,
    prefix: String,
    max_path_depth: Option<u32>,
}

impl ScopeFilter {
    /// Builds the filter for a crawl starting at `start_url`
    ///
    /// # Arguments
    ///
    /// * `start_url` - The crawl's start URL (must be http or https)
    /// * `scope_levels` - Directory levels above the start page's parent that stay in scope
    /// * `max_path_depth` - Maximum segments below the prefix (`None` = unbounded)
    ///
    /// # Examples
    ///
    /// ```
    /// use webmark::url::ScopeFilter;
    ///
    /// let filter = ScopeFilter::new("https://example.com/docs/intro", 0, None).unwrap();
    /// assert_eq!(filter.prefix(), "/docs/");
    /// assert!(filter.is_in_scope("https://example.com/docs/guide"));
    /// assert!(!filter.is_in_scope("https://example.com/blog/post"));
    /// ```
    pub fn new(
        start_url: &str,
        scope_levels: u32,
        max_path_depth: Option<u32>,
    ) -> Result<Self, UrlError> {
        let url = Url::parse(start_url)
            .map_err(|e| UrlError::Parse(format!("{}: {}", start_url, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }

        Ok(Self {
            origin: url.origin(),
            prefix: compute_scope_prefix(url.path(), scope_levels),
            max_path_depth,
        })
    }

    /// Builds the filter from a crawl policy's scope settings
    pub fn from_policy(start_url: &str, policy: &CrawlPolicy) -> Result<Self, UrlError> {
        Self::new(start_url, policy.scope_levels(), policy.max_path_depth())
    }

    /// Returns true if the candidate may be crawled
    ///
    /// Unparsable candidates are never in scope.
    pub fn is_in_scope(&self, candidate: &str) -> bool {
        let url = match Url::parse(candidate) {
            Ok(url) => url,
            Err(_) => return false,
        };

        if url.origin() != self.origin {
            return false;
        }

        let Some(relative) = url.path().strip_prefix(self.prefix.as_str()) else {
            return false;
        };

        match self.max_path_depth {
            Some(max) => {
                let depth = relative.split('/').filter(|s| !s.is_empty()).count();
                depth <= max as usize
            }
            None => true,
        }
    }

    /// Serialized origin of the start URL
    pub fn origin(&self) -> String {
        self.origin.ascii_serialization()
    }

    /// Path prefix every in-scope URL starts with (always ends in `/`)
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// Computes the scope prefix for a start path
///
/// `/a/b/c/page` has the parent segments `["", "a", "b", "c"]`; every scope
/// level removes one more trailing segment, but the root segment always stays.
fn compute_scope_prefix(path: &str, scope_levels: u32) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let parent = &segments[..segments.len().saturating_sub(1)];

    let keep = parent
        .len()
        .saturating_sub(scope_levels as usize)
        .max(1)
        .min(parent.len());

    let prefix = parent[..keep].join("/");
    if prefix.is_empty() {
        "/".to_string()
    } else {
        format!("{}/", prefix)
    }
}
