use async_trait::async_trait;
use serde_json::Value;

use super::draft::{Draft, Message};
use crate::clients::WhatsappClient;
use crate::core::models::{DispatchOutcome, Endpoint};
use crate::errors::SendError;

/// A poll sent through `sendPoll`.
#[derive(Debug, Clone)]
pub struct PollMessage {
    draft: Draft,
}

impl PollMessage {
    #[must_use]
    pub fn new(question: impl Into<String>) -> Self {
        let mut draft = Draft::default();
        draft.set("name", question.into());
        draft.set("options", Value::Array(Vec::new()));
        draft.set("multipleAnswers", false);
        Self { draft }
    }

    /// Append one answer choice.
    #[must_use]
    pub fn choice(mut self, choice: impl Into<String>) -> Self {
        let options = self.draft.value_mut("options");
        if !options.is_array() {
            *options = Value::Array(Vec::new());
        }
        if let Value::Array(choices) = options {
            choices.push(Value::String(choice.into()));
        }
        self
    }

    #[must_use]
    pub fn choices<I, S>(self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        choices.into_iter().fold(self, |poll, choice| poll.choice(choice))
    }

    #[must_use]
    pub fn multiple_answers(mut self, allowed: bool) -> Self {
        self.draft.set("multipleAnswers", allowed);
        self
    }
}

#[async_trait]
impl Message for PollMessage {
    fn draft(&self) -> &Draft {
        &self.draft
    }

    fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    async fn send(&self, client: &WhatsappClient) -> Result<DispatchOutcome, SendError> {
        self.draft.send_single(client, Endpoint::SendPoll).await
    }
}
