//! Completion-service client
//!
//! Talks to an OpenAI-compatible `/chat/completions` endpoint to post-process
//! converted Markdown: cleaning up conversion noise (refine) and translating
//! into another language (translate).

use crate::config::{LlmConfig, RetryPolicy};
use crate::llm::retry::fetch_with_retry;
use crate::llm::sse::collect_sse_stream;
use crate::LlmError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;

const REFINE_PROMPT: &str = "You clean up Markdown that an automated tool produced from a web page. \
The structure is already there, but page chrome and conversion artifacts remain.

Rules:
- Keep the YAML front matter block (--- ... ---) exactly as it is
- Drop navigation menus, sidebar link lists, tables of contents and breadcrumbs
- Drop UI leftovers such as \"Copy page\", \"Was this page helpful?\" prompts and empty anchor links
- Drop stray numbers that were step markers in the page layout
- Drop previous/next page links at the bottom
- Keep the article itself: headings, paragraphs, lists, code blocks, images and inline links
- Repair formatting damage from the conversion, such as broken headings or extra blank lines
- Never summarize or reword; the full content must survive
- Reply with the cleaned Markdown only";

fn translate_prompt(target_lang: &str) -> String {
    format!(
        "You translate Markdown documents into {target_lang}.

Rules:
- Keep the YAML front matter block (--- ... ---) exactly as it is, untranslated
- Keep all Markdown formatting: headings, lists, code blocks, images and links
- Leave code untranslated, both fenced blocks and inline code
- Keep technical terms in their original form where that reads better
- Translate everything else naturally
- Reply with the translated Markdown only"
    )
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible completion service
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: Client,
    config: LlmConfig,
    retry: RetryPolicy,
}

impl LlmClient {
    /// Creates a client with its own connection pool
    pub fn new(config: LlmConfig, retry: RetryPolicy) -> Self {
        Self::with_http_client(Client::new(), config, retry)
    }

    /// Creates a client that shares an existing `reqwest::Client`
    pub fn with_http_client(http: Client, config: LlmConfig, retry: RetryPolicy) -> Self {
        Self {
            http,
            config,
            retry,
        }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Removes page chrome and conversion artifacts from `markdown`
    pub async fn refine(&self, markdown: &str) -> Result<String, LlmError> {
        self.complete("refine", REFINE_PROMPT, markdown).await
    }

    /// Translates `markdown` into `target_lang`
    pub async fn translate(&self, markdown: &str, target_lang: &str) -> Result<String, LlmError> {
        self.complete("translate", &translate_prompt(target_lang), markdown)
            .await
    }

    /// Runs one streamed chat completion
    ///
    /// The request goes through [`fetch_with_retry`]. A server-sent event
    /// response is assembled fragment by fragment; a plain JSON response is
    /// read from `choices[0].message.content`.
    ///
    /// # Arguments
    ///
    /// * `task` - Label used in log lines
    /// * `system_prompt` - Instructions for the model
    /// * `content` - The document to process
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The model output
    /// * `Err(LlmError::Status)` - The service answered with a non-2xx status
    /// * `Err(LlmError)` - Transport, timeout or decoding failure
    pub async fn complete(
        &self,
        task: &str,
        system_prompt: &str,
        content: &str,
    ) -> Result<String, LlmError> {
        let started = Instant::now();
        tracing::info!(
            "LLM {} request started ({} chars)",
            task,
            content.chars().count()
        );

        let url = format!("{}/chat/completions", self.config.base_url);
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content,
                },
            ],
            temperature: 0.0,
            stream: true,
        };

        let request = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .build()
            .map_err(|source| LlmError::Transport {
                url: url.clone(),
                source,
            })?;

        let response = fetch_with_retry(&self.http, request, &self.retry).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let is_event_stream = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("text/event-stream"))
            .unwrap_or(false);

        let output = if is_event_stream {
            collect_sse_stream(response.bytes_stream()).await?
        } else {
            let bytes = response
                .bytes()
                .await
                .map_err(|source| LlmError::Transport { url, source })?;
            let parsed: ChatResponse = serde_json::from_slice(&bytes)?;
            parsed
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .unwrap_or_default()
        };

        tracing::info!(
            "LLM {} finished ({} chars, {:.1}s)",
            task,
            output.chars().count(),
            started.elapsed().as_secs_f64()
        );

        Ok(output)
    }
}
