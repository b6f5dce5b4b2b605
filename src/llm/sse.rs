//! Server-sent event stream assembly
//!
//! Completion responses requested with `stream: true` arrive as a sequence of
//! `data: {json}` lines. This module joins the `choices[0].delta.content`
//! fragments back into a single string.

use crate::LlmError;
use futures::{Stream, StreamExt};
use serde::Deserialize;

/// Terminal sentinel sent by the server after the last chunk
const DONE_SENTINEL: &str = "[DONE]";

/// Prefix carried by every data line
const DATA_PREFIX: &str = "data: ";

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    content: Option<String>,
}

/// Concatenates the content fragments of an SSE response body
///
/// Lines are split on `\n` as bytes arrive, so a line (or a multi-byte
/// character) broken across chunks is reassembled before it is decoded. Lines
/// without the `data: ` prefix, the `[DONE]` sentinel, and payloads that are
/// not valid JSON are skipped. A final line left unterminated when the stream
/// ends is still processed.
///
/// # Arguments
///
/// * `stream` - Body chunks, e.g. `reqwest::Response::bytes_stream()`
///
/// # Returns
///
/// * `Ok(String)` - The assembled content, possibly empty
/// * `Err(LlmError::Stream)` - Reading the body failed midway
pub async fn collect_sse_stream<S, B, E>(stream: S) -> Result<String, LlmError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    futures::pin_mut!(stream);

    let mut buffer: Vec<u8> = Vec::new();
    let mut content = String::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| LlmError::Stream(e.to_string()))?;
        buffer.extend_from_slice(chunk.as_ref());

        while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=newline).collect();
            append_line(&line, &mut content);
        }
    }

    if !buffer.is_empty() {
        append_line(&buffer, &mut content);
    }

    Ok(content)
}

fn append_line(raw: &[u8], content: &mut String) {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim_end_matches(['\n', '\r']);

    let Some(data) = line.strip_prefix(DATA_PREFIX) else {
        return;
    };
    let data = data.trim();
    if data == DONE_SENTINEL {
        return;
    }

    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => {
            if let Some(fragment) = chunk
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content)
            {
                content.push_str(&fragment);
            }
        }
        Err(e) => tracing::trace!("Skipping malformed SSE line: {}", e),
    }
}
