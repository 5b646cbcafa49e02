use async_trait::async_trait;
use serde_json::{Value, json};

use super::draft::{Draft, Message};
use crate::clients::WhatsappClient;
use crate::core::models::{DispatchOutcome, Endpoint};
use crate::errors::SendError;

/// A contact card sent through `sendContact`.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    draft: Draft,
}

impl ContactMessage {
    #[must_use]
    pub fn new(phone_number: impl Into<String>, name: impl Into<String>) -> Self {
        let mut draft = Draft::default();
        draft.set(
            "contact",
            json!({
                "phoneNumber": phone_number.into(),
                "name": name.into(),
            }),
        );
        Self { draft }
    }

    #[must_use]
    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        let mut contact = self.draft.get("contact").cloned().unwrap_or_else(|| json!({}));
        if let Value::Object(fields) = &mut contact {
            fields.insert("organization".to_string(), Value::String(organization.into()));
        }
        self.draft.set("contact", contact);
        self
    }
}

#[async_trait]
impl Message for ContactMessage {
    fn draft(&self) -> &Draft {
        &self.draft
    }

    fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    async fn send(&self, client: &WhatsappClient) -> Result<DispatchOutcome, SendError> {
        self.draft.send_single(client, Endpoint::SendContact).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_fields_are_nested() {
        let contact = ContactMessage::new("+201000000000", "Support Desk").organization("Acme");
        assert_eq!(
            contact.payload_value("contact"),
            Some(&json!({
                "phoneNumber": "+201000000000",
                "name": "Support Desk",
                "organization": "Acme"
            }))
        );
    }
}
