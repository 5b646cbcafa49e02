use async_trait::async_trait;

use super::draft::{Draft, Message};
use crate::clients::WhatsappClient;
use crate::core::models::{DispatchOutcome, Endpoint};
use crate::errors::SendError;

/// A map pin sent through `sendLocation`.
#[derive(Debug, Clone)]
pub struct LocationMessage {
    draft: Draft,
}

impl LocationMessage {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        let mut draft = Draft::default();
        draft.set("latitude", latitude);
        draft.set("longitude", longitude);
        Self { draft }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.draft.set("name", name.into());
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.draft.set("address", address.into());
        self
    }
}

#[async_trait]
impl Message for LocationMessage {
    fn draft(&self) -> &Draft {
        &self.draft
    }

    fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    async fn send(&self, client: &WhatsappClient) -> Result<DispatchOutcome, SendError> {
        self.draft.send_single(client, Endpoint::SendLocation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coordinates_are_numbers() {
        let location = LocationMessage::new(30.0444, 31.2357)
            .name("Cairo Office")
            .address("Tahrir Square");
        assert_eq!(location.payload_value("latitude"), Some(&json!(30.0444)));
        assert_eq!(location.payload_value("longitude"), Some(&json!(31.2357)));
        assert_eq!(location.payload_value("name"), Some(&json!("Cairo Office")));
    }
}
