//! Notification channel adapter.
//!
//! The host application decides *when* to notify someone; this module turns
//! that decision into a send: it fills in a missing recipient from the
//! notifiable, respects the message's send gate, and reports failures to the
//! message's error callback before propagating them.

use tracing::{error, info};

use crate::clients::WhatsappClient;
use crate::core::models::DispatchOutcome;
use crate::errors::SendError;
use crate::message::Message;

/// Something that can receive WhatsApp notifications.
pub trait Notifiable {
    /// Phone number in international format used when a message names no
    /// recipient itself.
    fn route_whatsapp(&self) -> Option<String> {
        None
    }
}

/// A notification that knows how to express itself as a WhatsApp message.
pub trait WhatsappNotification<N: ?Sized> {
    type Message: Message;

    /// `None` means there is nothing to send for this notifiable.
    fn to_whatsapp(&self, notifiable: &N) -> Option<Self::Message>;
}

#[derive(Debug, Clone)]
pub struct WhatsappChannel {
    client: WhatsappClient,
}

impl WhatsappChannel {
    #[must_use]
    pub fn new(client: WhatsappClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn client(&self) -> &WhatsappClient {
        &self.client
    }

    /// Build the notification's message for `notifiable` and send it.
    ///
    /// # Errors
    ///
    /// See [`WhatsappChannel::send`].
    pub async fn notify<N, T>(
        &self,
        notifiable: &N,
        notification: &T,
    ) -> Result<DispatchOutcome, SendError>
    where
        N: Notifiable + ?Sized,
        T: WhatsappNotification<N>,
    {
        match notification.to_whatsapp(notifiable) {
            Some(message) => self.send(notifiable, message).await,
            None => Ok(DispatchOutcome::Suppressed),
        }
    }

    /// Send `message`, routing it to `notifiable` when it has no recipient.
    ///
    /// # Errors
    ///
    /// Returns the error from [`Message::send`] after the message's error
    /// callback, if any, has observed it.
    pub async fn send<N, M>(&self, notifiable: &N, message: M) -> Result<DispatchOutcome, SendError>
    where
        N: Notifiable + ?Sized,
        M: Message,
    {
        let message = if message.to_not_given() {
            match notifiable.route_whatsapp() {
                Some(phone_number) => message.to(&phone_number),
                None => {
                    info!("No WhatsApp recipient available; notification skipped");
                    return Ok(DispatchOutcome::Suppressed);
                }
            }
        } else {
            message
        };

        match message.send(&self.client).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!("Failed to send WhatsApp notification: {}", e);
                message.handle_error(&e);
                Err(e)
            }
        }
    }
}
