//! Configuration module for Webmark
//!
//! This module holds the validated runtime policies (`CrawlPolicy`,
//! `RetryPolicy`) and the optional TOML configuration file they can be
//! layered from.
//!
//! # Example
//!
//! ```no_run
//! use webmark::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("webmark.toml")).unwrap();
//! println!("Retries: {}", config.retry_policy().max_retries);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CrawlPolicy, CrawlPolicyBuilder, CrawlSection, FetchConfig, FetchSection, FileConfig,
    LlmConfig, LlmSection, RetryPolicy, RetrySection,
};

// Re-export parser functions
pub use parser::{
    load_config, parse_config, resolve_llm_config, resolve_llm_config_with, ENV_LLM_API_KEY,
    ENV_LLM_BASE_URL, ENV_LLM_MODEL,
};
