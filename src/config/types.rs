use crate::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Immutable policy for one crawl run
///
/// Built once through [`CrawlPolicy::builder`], which resolves defaults and
/// rejects invalid values before any page is converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlPolicy {
    output_dir: PathBuf,
    max_link_depth: u32,
    max_path_depth: Option<u32>,
    scope_levels: u32,
    concurrency: usize,
}

impl CrawlPolicy {
    pub const DEFAULT_MAX_LINK_DEPTH: u32 = 3;
    pub const DEFAULT_MAX_PATH_DEPTH: Option<u32> = Some(1);
    pub const DEFAULT_SCOPE_LEVELS: u32 = 0;
    pub const DEFAULT_CONCURRENCY: usize = 3;

    /// Starts building a policy that writes into `output_dir`
    pub fn builder(output_dir: impl Into<PathBuf>) -> CrawlPolicyBuilder {
        CrawlPolicyBuilder {
            output_dir: output_dir.into(),
            max_link_depth: Self::DEFAULT_MAX_LINK_DEPTH,
            max_path_depth: Self::DEFAULT_MAX_PATH_DEPTH,
            scope_levels: Self::DEFAULT_SCOPE_LEVELS,
            concurrency: Self::DEFAULT_CONCURRENCY,
        }
    }

    /// Directory that converted Markdown files are written under
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Maximum number of link hops from the start URL
    pub fn max_link_depth(&self) -> u32 {
        self.max_link_depth
    }

    /// Maximum path-segment depth below the scope prefix (`None` = unbounded)
    pub fn max_path_depth(&self) -> Option<u32> {
        self.max_path_depth
    }

    /// Number of directory levels above the start page that are in scope
    pub fn scope_levels(&self) -> u32 {
        self.scope_levels
    }

    /// Upper bound on simultaneously running conversions
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
}

/// Builder for [`CrawlPolicy`]
#[derive(Debug, Clone)]
pub struct CrawlPolicyBuilder {
    output_dir: PathBuf,
    max_link_depth: u32,
    max_path_depth: Option<u32>,
    scope_levels: u32,
    concurrency: usize,
}

impl CrawlPolicyBuilder {
    pub fn max_link_depth(mut self, depth: u32) -> Self {
        self.max_link_depth = depth;
        self
    }

    pub fn max_path_depth(mut self, depth: Option<u32>) -> Self {
        self.max_path_depth = depth;
        self
    }

    pub fn scope_levels(mut self, levels: u32) -> Self {
        self.scope_levels = levels;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Validates the collected values and produces the policy
    pub fn build(self) -> Result<CrawlPolicy, ConfigError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output_dir cannot be empty".to_string(),
            ));
        }

        if self.concurrency < 1 {
            return Err(ConfigError::Validation(format!(
                "concurrency must be >= 1, got {}",
                self.concurrency
            )));
        }

        Ok(CrawlPolicy {
            output_dir: self.output_dir,
            max_link_depth: self.max_link_depth,
            max_path_depth: self.max_path_depth,
            scope_levels: self.scope_levels,
            concurrency: self.concurrency,
        })
    }
}

/// Retry and timeout policy for calls to the completion service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry; doubles for every further retry (milliseconds)
    pub base_delay_ms: u64,

    /// Upper bound for a single attempt (milliseconds)
    pub timeout_ms: u64,
}

impl RetryPolicy {
    /// Total number of attempts this policy allows
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay to wait before `attempt` (0-based; the first attempt never waits)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 1u64.checked_shl(attempt - 1).unwrap_or(u64::MAX);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 1000,
            timeout_ms: 60_000,
        }
    }
}

/// Credentials and model for an OpenAI-compatible completion service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// HTTP settings used when fetching pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("webmark/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        }
    }
}

/// On-disk TOML configuration; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub crawl: CrawlSection,
    #[serde(default)]
    pub retry: RetrySection,
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub fetch: FetchSection,
}

/// `[crawl]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlSection {
    #[serde(rename = "output-dir")]
    pub output_dir: Option<PathBuf>,

    #[serde(rename = "max-link-depth")]
    pub max_link_depth: Option<u32>,

    #[serde(rename = "max-path-depth")]
    pub max_path_depth: Option<u32>,

    /// Disables the path-depth bound entirely
    #[serde(rename = "unbounded-path-depth", default)]
    pub unbounded_path_depth: bool,

    #[serde(rename = "scope-levels")]
    pub scope_levels: Option<u32>,

    pub concurrency: Option<usize>,
}

/// `[retry]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetrySection {
    #[serde(rename = "max-retries")]
    pub max_retries: Option<u32>,

    #[serde(rename = "base-delay-ms")]
    pub base_delay_ms: Option<u64>,

    #[serde(rename = "timeout-ms")]
    pub timeout_ms: Option<u64>,
}

/// `[llm]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmSection {
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    #[serde(rename = "api-key")]
    pub api_key: Option<String>,

    pub model: Option<String>,
}

/// `[fetch]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchSection {
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,

    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Retry policy with file values layered over the defaults
    pub fn retry_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy {
            max_retries: self.retry.max_retries.unwrap_or(defaults.max_retries),
            base_delay_ms: self.retry.base_delay_ms.unwrap_or(defaults.base_delay_ms),
            timeout_ms: self.retry.timeout_ms.unwrap_or(defaults.timeout_ms),
        }
    }

    /// Fetch settings with file values layered over the defaults
    pub fn fetch_config(&self) -> FetchConfig {
        let defaults = FetchConfig::default();
        FetchConfig {
            user_agent: self
                .fetch
                .user_agent
                .clone()
                .unwrap_or(defaults.user_agent),
            timeout_secs: self.fetch.timeout_secs.unwrap_or(defaults.timeout_secs),
        }
    }
}
