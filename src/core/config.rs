use std::env;
use std::time::Duration;

use crate::errors::SendError;

/// HyperSender API base URI used when none is configured.
pub const DEFAULT_API_BASE_URI: &str = "https://app.hypersender.com/api/whatsapp/v1";

/// Pause between consecutive segments of a chunked message.
pub const DEFAULT_CHUNK_DELAY: Duration = Duration::from_secs(1);

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for one HyperSender instance.
///
/// Immutable once built; the client wraps it in an `Arc` and shares it across
/// every send.
#[derive(Clone)]
pub struct ClientConfig {
    api_base_uri: String,
    instance_id: String,
    token: Option<String>,
    chunk_size: usize,
    chunk_delay: Duration,
    request_timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base_uri", &self.api_base_uri)
            .field("instance_id", &self.instance_id)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("chunk_size", &self.chunk_size)
            .field("chunk_delay", &self.chunk_delay)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ClientConfig {
    #[must_use]
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            api_base_uri: DEFAULT_API_BASE_URI.to_string(),
            instance_id: instance_id.into(),
            token: None,
            chunk_size: 0,
            chunk_delay: DEFAULT_CHUNK_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// # Errors
    ///
    /// Returns [`SendError::Config`] when `HYPERSENDER_INSTANCE_ID` is missing or a
    /// numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, SendError> {
        let instance_id = env::var("HYPERSENDER_INSTANCE_ID")
            .map_err(|e| SendError::Config(format!("HYPERSENDER_INSTANCE_ID: {e}")))?;

        let mut config = Self::new(instance_id);

        if let Ok(base) = env::var("HYPERSENDER_API_BASE_URI") {
            config = config.with_api_base_uri(base);
        }
        if let Ok(token) = env::var("HYPERSENDER_TOKEN") {
            config = config.with_token(token);
        }
        if let Some(size) = parse_env_number("HYPERSENDER_CHUNK_SIZE")? {
            config = config.with_chunk_size(usize::try_from(size).unwrap_or(usize::MAX));
        }
        if let Some(ms) = parse_env_number("HYPERSENDER_CHUNK_DELAY_MS")? {
            config = config.with_chunk_delay(Duration::from_millis(ms));
        }
        if let Some(secs) = parse_env_number("HYPERSENDER_TIMEOUT_SECS")? {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_api_base_uri(mut self, api_base_uri: impl Into<String>) -> Self {
        self.api_base_uri = api_base_uri.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// A size of zero keeps the built-in segment limit.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    #[must_use]
    pub fn with_chunk_delay(mut self, chunk_delay: Duration) -> Self {
        self.chunk_delay = chunk_delay;
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    #[must_use]
    pub fn api_base_uri(&self) -> &str {
        &self.api_base_uri
    }

    #[must_use]
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    #[must_use]
    pub fn chunk_delay(&self) -> Duration {
        self.chunk_delay
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

fn parse_env_number(name: &str) -> Result<Option<u64>, SendError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| SendError::Config(format!("{name}: {e}"))),
        Err(_) => Ok(None),
    }
}
