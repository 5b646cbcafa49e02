//! Sequential delivery of chunked text messages.
//!
//! Segments are sent strictly in order: segment N+1 is not issued until the
//! call for segment N has returned and the rate-limit pause has elapsed. The
//! first failing segment aborts the run and its error is returned; results of
//! segments delivered before it are dropped.

pub mod chunker;

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clients::whatsapp_client::{WhatsappClient, read_json};
use crate::core::models::{Payload, TEXT_KEY};
use crate::errors::SendError;

pub use chunker::{CHUNK_SEPARATOR, DEFAULT_CHUNK_SIZE, chunk_text, effective_chunk_size};

/// Per-send knobs for a chunked dispatch.
#[derive(Debug, Clone, Copy)]
pub struct ChunkSettings {
    /// Segment limit in display columns; zero selects [`DEFAULT_CHUNK_SIZE`].
    pub chunk_size: usize,
    /// Pause after a delivered segment when another one follows.
    pub delay: Duration,
    pub safe_mode: bool,
}

impl ChunkSettings {
    /// Settings drawn from the client configuration.
    #[must_use]
    pub fn from_client(client: &WhatsappClient) -> Self {
        Self {
            chunk_size: client.config().chunk_size(),
            delay: client.config().chunk_delay(),
            safe_mode: false,
        }
    }
}

/// Deliver the `text` field of `params` as one or more segments.
///
/// Every other payload field is copied unchanged into each segment's request.
/// Returns the decoded JSON body of each delivered segment, in order. Empty
/// segments and empty or `null` response bodies are omitted, so empty text
/// yields an empty vector without any request.
///
/// # Errors
///
/// Returns the first transport, backend or decoding error encountered;
/// remaining segments are not sent.
pub async fn dispatch_chunked(
    client: &WhatsappClient,
    params: &Payload,
    settings: &ChunkSettings,
    token: Option<&str>,
) -> Result<Vec<Value>, SendError> {
    let text = params
        .get(TEXT_KEY)
        .and_then(Value::as_str)
        .unwrap_or_default();
    let limit = effective_chunk_size(settings.chunk_size);

    let segments: Vec<String> = chunk_text(text, limit)
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .collect();
    let total = segments.len();

    debug!(
        "Split message of {} columns into {} segment(s) (limit={})",
        chunker::display_width(text),
        total,
        limit
    );

    let mut results = Vec::with_capacity(total);

    for (index, segment) in segments.into_iter().enumerate() {
        let mut payload = params.clone();
        payload.insert(TEXT_KEY.to_string(), Value::String(segment));

        info!("Sending segment {}/{}", index + 1, total);

        let response = match client
            .send_message(&payload, settings.safe_mode, token)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    "Aborting chunked send after {} of {} segment(s): {}",
                    index, total, e
                );
                return Err(e);
            }
        };

        let decoded = read_json(response).await?;
        // Only an absent body counts as no response; `[]`, `false` and `0` are kept.
        if !decoded.is_null() {
            results.push(decoded);
        }

        if index + 1 < total {
            tokio::time::sleep(settings.delay).await;
        }
    }

    Ok(results)
}
