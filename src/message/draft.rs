//! State and fluent setters shared by every outbound message kind.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::clients::WhatsappClient;
use crate::core::models::{CHAT_ID_KEY, DispatchOutcome, Endpoint, Payload};
use crate::errors::SendError;

/// Suffix turning a phone number into a WhatsApp chat address.
pub const CHAT_ID_SUFFIX: &str = "@c.us";

pub type ErrorHandler = Arc<dyn Fn(&SendError) + Send + Sync>;
pub type SendCondition = Arc<dyn Fn() -> bool + Send + Sync>;

/// One outbound payload plus the per-message overrides that travel with it.
#[derive(Clone, Default)]
pub struct Draft {
    payload: Payload,
    token: Option<String>,
    error_handler: Option<ErrorHandler>,
    send_condition: Option<SendCondition>,
}

impl std::fmt::Debug for Draft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Draft")
            .field("payload", &self.payload)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("error_handler", &self.error_handler.is_some())
            .field("send_condition", &self.send_condition.is_some())
            .finish()
    }
}

impl Serialize for Draft {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.payload.serialize(serializer)
    }
}

impl Draft {
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.payload.insert(key.into(), value.into());
    }

    /// Mutable access to a payload field, inserted as `null` when absent.
    pub fn value_mut(&mut self, key: &str) -> &mut Value {
        self.payload.entry(key).or_insert(Value::Null)
    }

    pub fn set_recipient(&mut self, phone_number: &str) {
        self.set(CHAT_ID_KEY, format!("{phone_number}{CHAT_ID_SUFFIX}"));
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn set_error_handler(&mut self, handler: ErrorHandler) {
        self.error_handler = Some(handler);
    }

    pub fn set_send_condition(&mut self, condition: SendCondition) {
        self.send_condition = Some(condition);
    }

    #[must_use]
    pub fn can_send(&self) -> bool {
        self.send_condition.as_ref().is_none_or(|condition| condition())
    }

    #[must_use]
    pub fn has_recipient(&self) -> bool {
        self.payload.contains_key(CHAT_ID_KEY)
    }

    /// Run the registered error callback. Returns whether one was registered.
    pub fn report_error(&self, error: &SendError) -> bool {
        match &self.error_handler {
            Some(handler) => {
                handler(error);
                true
            }
            None => false,
        }
    }

    /// Gate check and recipient validation before any I/O.
    ///
    /// `Ok(None)` means the send condition said no.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::InvalidRecipient`] when no usable chat id is set.
    pub fn prepare(&self) -> Result<Option<&Payload>, SendError> {
        if !self.can_send() {
            debug!("Send condition not met; skipping message");
            return Ok(None);
        }

        match self.payload.get(CHAT_ID_KEY) {
            None => Err(SendError::InvalidRecipient(
                "no recipient chat id set; call `to()` first".to_string(),
            )),
            Some(Value::String(chat_id)) if chat_id == CHAT_ID_SUFFIX => {
                Err(SendError::InvalidRecipient("empty phone number".to_string()))
            }
            Some(_) => Ok(Some(&self.payload)),
        }
    }

    /// Single JSON call for message kinds that are never chunked.
    pub(crate) async fn send_single(
        &self,
        client: &WhatsappClient,
        endpoint: Endpoint,
    ) -> Result<DispatchOutcome, SendError> {
        let Some(payload) = self.prepare()? else {
            return Ok(DispatchOutcome::Suppressed);
        };

        let response = client.post_json(endpoint, payload, self.token()).await?;
        Ok(DispatchOutcome::Single(response))
    }
}

/// Fluent configuration shared by all message kinds.
///
/// Setters consume and return the message so calls chain:
///
/// ```
/// use hypersender::message::{Message, TextMessage};
///
/// let message = TextMessage::create("Your code is 123456")
///     .to("201234567890")
///     .send_when(true);
///
/// assert_eq!(
///     message.payload_value("chatId").and_then(|v| v.as_str()),
///     Some("201234567890@c.us")
/// );
/// ```
#[async_trait]
pub trait Message: Sized + Send + Sync {
    fn draft(&self) -> &Draft;

    fn draft_mut(&mut self) -> &mut Draft;

    /// Deliver the message.
    ///
    /// # Errors
    ///
    /// Returns the transport, backend or precondition error that stopped the send.
    async fn send(&self, client: &WhatsappClient) -> Result<DispatchOutcome, SendError>;

    /// Set the recipient from a phone number in international format
    /// (e.g. `201234567890`).
    #[must_use]
    fn to(mut self, phone_number: &str) -> Self {
        self.draft_mut().set_recipient(phone_number);
        self
    }

    /// Override the configured credential for this message only.
    #[must_use]
    fn token(mut self, token: impl Into<String>) -> Self {
        self.draft_mut().set_token(token.into());
        self
    }

    /// Merge extra fields into the payload; later keys replace earlier ones.
    #[must_use]
    fn options<I, K>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (key, value) in options {
            self.draft_mut().set(key, value);
        }
        self
    }

    #[must_use]
    fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.draft_mut().set(key, value);
        self
    }

    #[must_use]
    fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SendError) + Send + Sync + 'static,
    {
        self.draft_mut().set_error_handler(Arc::new(callback));
        self
    }

    #[must_use]
    fn send_when(mut self, condition: bool) -> Self {
        self.draft_mut().set_send_condition(Arc::new(move || condition));
        self
    }

    /// Gate the send on a predicate evaluated at dispatch time.
    #[must_use]
    fn send_when_with<F>(mut self, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.draft_mut().set_send_condition(Arc::new(predicate));
        self
    }

    fn can_send(&self) -> bool {
        self.draft().can_send()
    }

    fn to_not_given(&self) -> bool {
        !self.draft().has_recipient()
    }

    fn has_token(&self) -> bool {
        self.draft().token().is_some()
    }

    fn payload_value(&self, key: &str) -> Option<&Value> {
        self.draft().get(key)
    }

    fn payload(&self) -> &Payload {
        self.draft().payload()
    }

    /// Hand `error` to the callback registered with [`Message::on_error`].
    fn handle_error(&self, error: &SendError) -> bool {
        self.draft().report_error(error)
    }
}
