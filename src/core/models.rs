use serde_json::{Map, Value};

/// Field name → value map sent as the request body.
pub type Payload = Map<String, Value>;

/// Payload key holding the recipient chat address.
pub const CHAT_ID_KEY: &str = "chatId";

/// Payload key holding the message body of a text send.
pub const TEXT_KEY: &str = "text";

/// Kind of media accepted by the `sendFile<Type>` actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Video,
    Audio,
    Document,
}

/// Backend action appended to `{baseUri}/{instanceId}/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    SendText,
    SendTextSafe,
    SendFile(FileKind),
    SendPoll,
    SendContact,
    SendLocation,
    GetUpdates,
}

impl Endpoint {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::SendText => "send-text",
            Endpoint::SendTextSafe => "send-text-safe",
            Endpoint::SendFile(FileKind::Image) => "sendFileImage",
            Endpoint::SendFile(FileKind::Video) => "sendFileVideo",
            Endpoint::SendFile(FileKind::Audio) => "sendFileAudio",
            Endpoint::SendFile(FileKind::Document) => "sendFileDocument",
            Endpoint::SendPoll => "sendPoll",
            Endpoint::SendContact => "sendContact",
            Endpoint::SendLocation => "sendLocation",
            Endpoint::GetUpdates => "getUpdates",
        }
    }

    /// Text endpoint for the given safe-mode flag.
    #[must_use]
    pub fn text(safe_mode: bool) -> Self {
        if safe_mode {
            Endpoint::SendTextSafe
        } else {
            Endpoint::SendText
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of sending one message.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// One call was made; the raw response is handed back undecoded.
    Single(reqwest::Response),
    /// Decoded JSON bodies, one per delivered segment, in send order.
    Chunked(Vec<Value>),
    /// Nothing was sent because the send gate was closed or no recipient
    /// could be resolved.
    Suppressed,
}

impl DispatchOutcome {
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        matches!(self, DispatchOutcome::Suppressed)
    }

    /// Per-segment results of a chunked send, if this outcome is one.
    #[must_use]
    pub fn chunks(&self) -> Option<&[Value]> {
        match self {
            DispatchOutcome::Chunked(values) => Some(values),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_response(self) -> Option<reqwest::Response> {
        match self {
            DispatchOutcome::Single(response) => Some(response),
            _ => None,
        }
    }
}
