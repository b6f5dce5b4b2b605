use crate::config::types::{FileConfig, LlmConfig, LlmSection};
use crate::config::validation::validate;
use crate::{ConfigError, LlmError};
use std::path::Path;

/// Environment variable holding the completion-service base URL
pub const ENV_LLM_BASE_URL: &str = "OPENAI_API_BASE_URL";
/// Environment variable holding the completion-service API key
pub const ENV_LLM_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding the completion-service model name
pub const ENV_LLM_MODEL: &str = "OPENAI_API_MODEL";

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(FileConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use webmark::config::load_config;
///
/// let config = load_config(Path::new("webmark.toml")).unwrap();
/// println!("Concurrency: {:?}", config.crawl.concurrency);
/// ```
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<FileConfig, ConfigError> {
    let config: FileConfig = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Resolves completion-service settings from the `[llm]` section, falling
/// back to the process environment for any key the file leaves out
pub fn resolve_llm_config(section: &LlmSection) -> Result<LlmConfig, LlmError> {
    resolve_llm_config_with(section, |key| std::env::var(key).ok())
}

/// Same as [`resolve_llm_config`] with an injectable environment lookup
pub fn resolve_llm_config_with<F>(section: &LlmSection, env: F) -> Result<LlmConfig, LlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let pick = |value: &Option<String>, key: &str| -> Result<String, LlmError> {
        value
            .clone()
            .or_else(|| env(key))
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| LlmError::MissingConfig(format!("{} is not set", key)))
    };

    Ok(LlmConfig {
        base_url: pick(&section.base_url, ENV_LLM_BASE_URL)?
            .trim_end_matches('/')
            .to_string(),
        api_key: pick(&section.api_key, ENV_LLM_API_KEY)?,
        model: pick(&section.model, ENV_LLM_MODEL)?,
    })
}
