use crate::config::types::{CrawlSection, FetchSection, FileConfig, LlmSection, RetrySection};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    validate_crawl_section(&config.crawl)?;
    validate_retry_section(&config.retry)?;
    validate_llm_section(&config.llm)?;
    validate_fetch_section(&config.fetch)?;
    Ok(())
}

/// Validates crawl settings
fn validate_crawl_section(section: &CrawlSection) -> Result<(), ConfigError> {
    if let Some(concurrency) = section.concurrency {
        if !(1..=100).contains(&concurrency) {
            return Err(ConfigError::Validation(format!(
                "concurrency must be between 1 and 100, got {}",
                concurrency
            )));
        }
    }

    if let Some(dir) = &section.output_dir {
        if dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output-dir cannot be empty".to_string(),
            ));
        }
    }

    if section.unbounded_path_depth && section.max_path_depth.is_some() {
        return Err(ConfigError::Validation(
            "max-path-depth conflicts with unbounded-path-depth".to_string(),
        ));
    }

    Ok(())
}

/// Validates retry settings
fn validate_retry_section(section: &RetrySection) -> Result<(), ConfigError> {
    if let Some(retries) = section.max_retries {
        if retries > 10 {
            return Err(ConfigError::Validation(format!(
                "max-retries must be <= 10, got {}",
                retries
            )));
        }
    }

    if section.timeout_ms == Some(0) {
        return Err(ConfigError::Validation(
            "timeout-ms must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates completion-service settings
fn validate_llm_section(section: &LlmSection) -> Result<(), ConfigError> {
    if let Some(base_url) = &section.base_url {
        let url = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid llm base-url: {}", e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "llm base-url must use http or https, got '{}'",
                base_url
            )));
        }
    }

    Ok(())
}

/// Validates page fetch settings
fn validate_fetch_section(section: &FetchSection) -> Result<(), ConfigError> {
    if let Some(agent) = &section.user_agent {
        if agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user-agent cannot be empty".to_string(),
            ));
        }
    }

    if section.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout-secs must be > 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_concurrency_bounds() {
        let mut section = CrawlSection::default();
        section.concurrency = Some(1);
        assert!(validate_crawl_section(&section).is_ok());

        section.concurrency = Some(0);
        assert!(validate_crawl_section(&section).is_err());

        section.concurrency = Some(101);
        assert!(validate_crawl_section(&section).is_err());
    }

    #[test]
    fn test_validate_conflicting_path_depth() {
        let section = CrawlSection {
            max_path_depth: Some(2),
            unbounded_path_depth: true,
            ..CrawlSection::default()
        };
        assert!(validate_crawl_section(&section).is_err());
    }

    #[test]
    fn test_validate_llm_base_url() {
        let mut section = LlmSection::default();
        section.base_url = Some("https://api.example.com/v1".to_string());
        assert!(validate_llm_section(&section).is_ok());

        section.base_url = Some("not a url".to_string());
        assert!(matches!(
            validate_llm_section(&section),
            Err(ConfigError::InvalidUrl(_))
        ));

        section.base_url = Some("ftp://api.example.com".to_string());
        assert!(validate_llm_section(&section).is_err());
    }

    #[test]
    fn test_validate_retry_section() {
        let mut section = RetrySection::default();
        assert!(validate_retry_section(&section).is_ok());

        section.timeout_ms = Some(0);
        assert!(validate_retry_section(&section).is_err());

        section.timeout_ms = None;
        section.max_retries = Some(11);
        assert!(validate_retry_section(&section).is_err());
    }

    #[test]
    fn test_validate_fetch_section() {
        let section = FetchSection {
            user_agent: Some("   ".to_string()),
            timeout_secs: None,
        };
        assert!(validate_fetch_section(&section).is_err());
    }
}
