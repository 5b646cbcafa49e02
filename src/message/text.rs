use async_trait::async_trait;
use serde_json::Value;

use super::draft::{Draft, Message};
use crate::clients::WhatsappClient;
use crate::core::models::{DispatchOutcome, TEXT_KEY};
use crate::dispatch::{ChunkSettings, dispatch_chunked};
use crate::errors::SendError;
use crate::render::TemplateRenderer;
use crate::utils::markdown::escape_markdown;

/// A text message, split into segments when it is too long for one send.
#[derive(Debug, Clone)]
pub struct TextMessage {
    draft: Draft,
    should_chunk: bool,
    chunk_size: usize,
    safe_mode: bool,
}

impl Default for TextMessage {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMessage {
    /// Empty message with link previews disabled.
    #[must_use]
    pub fn new() -> Self {
        let mut draft = Draft::default();
        draft.set(TEXT_KEY, "");
        draft.set("link_preview", false);

        Self {
            draft,
            should_chunk: true,
            chunk_size: 0,
            safe_mode: false,
        }
    }

    #[must_use]
    pub fn create(content: impl Into<String>) -> Self {
        Self::new().content(content)
    }

    /// Replace the body. Marks the message as chunk-eligible.
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.should_chunk = true;
        self.draft.set(TEXT_KEY, content.into());
        self
    }

    /// Append `line` and a newline to the body.
    #[must_use]
    pub fn line(mut self, line: &str) -> Self {
        let body = self.draft.value_mut(TEXT_KEY);
        if !body.is_string() {
            *body = Value::String(String::new());
        }
        if let Value::String(text) = body {
            text.push_str(line);
            text.push('\n');
        }
        self
    }

    #[must_use]
    pub fn line_if(self, condition: bool, line: &str) -> Self {
        if condition { self.line(line) } else { self }
    }

    /// Append `line` with markdown markup escaped.
    #[must_use]
    pub fn escaped_line(self, line: &str) -> Self {
        let escaped = escape_markdown(line);
        self.line(&escaped)
    }

    /// Render `template` with `data` into the body.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Template`] if rendering fails.
    pub fn view<R>(self, renderer: &R, template: &str, data: &Value) -> Result<Self, SendError>
    where
        R: TemplateRenderer + ?Sized,
    {
        let rendered = renderer.render(template, data)?;
        Ok(self.content(rendered))
    }

    /// Enable or disable splitting of long bodies.
    #[must_use]
    pub fn chunk(mut self, chunk: bool) -> Self {
        self.should_chunk = chunk;
        self
    }

    /// Per-message segment limit; zero defers to the client configuration.
    #[must_use]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Route through the `send-text-safe` endpoint.
    #[must_use]
    pub fn safe_mode(mut self, safe_mode: bool) -> Self {
        self.safe_mode = safe_mode;
        self
    }

    #[must_use]
    pub fn reply_to(mut self, message_id: impl Into<String>) -> Self {
        self.draft.set("reply_to", message_id.into());
        self
    }

    #[must_use]
    pub fn link_preview(mut self, enabled: bool) -> Self {
        self.draft.set("link_preview", enabled);
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.draft
            .get(TEXT_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_chunked(&self) -> bool {
        self.should_chunk
    }

    #[must_use]
    pub fn is_safe_mode(&self) -> bool {
        self.safe_mode
    }

    fn chunk_settings(&self, client: &WhatsappClient) -> ChunkSettings {
        let mut settings = ChunkSettings::from_client(client);
        if self.chunk_size > 0 {
            settings.chunk_size = self.chunk_size;
        }
        settings.safe_mode = self.safe_mode;
        settings
    }
}

#[async_trait]
impl Message for TextMessage {
    fn draft(&self) -> &Draft {
        &self.draft
    }

    fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    async fn send(&self, client: &WhatsappClient) -> Result<DispatchOutcome, SendError> {
        let Some(payload) = self.draft.prepare()? else {
            return Ok(DispatchOutcome::Suppressed);
        };

        if self.should_chunk {
            let settings = self.chunk_settings(client);
            let results = dispatch_chunked(client, payload, &settings, self.draft.token()).await?;
            return Ok(DispatchOutcome::Chunked(results));
        }

        let response = client
            .send_message(payload, self.safe_mode, self.draft.token())
            .await?;
        Ok(DispatchOutcome::Single(response))
    }
}
