//! Resilient calls to the completion service
//!
//! This module handles:
//! - Retrying transient HTTP failures with exponential backoff
//! - Assembling server-sent event streams into text
//! - Refine and translate requests against an OpenAI-compatible API

mod client;
mod retry;
mod sse;

pub use client::LlmClient;
pub use retry::{fetch_with_retry, is_retryable};
pub use sse::collect_sse_stream;
