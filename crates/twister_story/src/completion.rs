//! Completion client adapter.

use crate::{JSON_SYSTEM_PROMPT, extraction};
use serde_json::{Map, Value};
use twister_core::{Conversation, GenerateRequest, Message};
use twister_error::{TransportError, TransportErrorKind, TwisterResult, ValidationError};
use twister_interface::TwisterDriver;
use tracing::{debug, instrument};

/// One call into the completion service per conversation turn.
///
/// The adapter owns the driver and the system prompt. It never mutates shared
/// state: every call takes a conversation by value and hands back the same
/// conversation extended with the assistant turn.
#[derive(Debug, Clone)]
pub struct CompletionAdapter<D> {
    driver: D,
    system_prompt: String,
}

impl<D: TwisterDriver> CompletionAdapter<D> {
    /// Adapter with the default JSON system prompt.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            system_prompt: JSON_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Replace the system prompt opening JSON-mode conversations.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// The wrapped driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// An empty conversation, opened with the system turn in JSON mode.
    pub fn opening(&self, json_mode: bool) -> Conversation {
        let mut conversation = Conversation::new();
        if json_mode {
            conversation.push(Message::system(self.system_prompt.clone()));
        }
        conversation
    }

    /// Send `conversation` and return the assistant payload with the extended conversation.
    ///
    /// In JSON mode the payload must parse as a JSON object.
    ///
    /// # Errors
    ///
    /// Transport failures propagate from the driver; an empty response is
    /// [`TransportErrorKind::EmptyChoice`]; a JSON-mode payload that is not an
    /// object is a malformed response.
    #[instrument(
        skip(self, conversation),
        fields(provider = self.driver.provider_name(), turns = conversation.len())
    )]
    pub async fn complete(
        &self,
        conversation: Conversation,
        json_mode: bool,
    ) -> TwisterResult<(String, Conversation)> {
        let payload = self.send(&conversation, json_mode).await?;
        if json_mode {
            extraction::parse_object(&payload)?;
        }
        let conversation = conversation.with(Message::assistant(payload.clone()));
        Ok((payload, conversation))
    }

    /// JSON-mode [`complete`](Self::complete), returning the parsed object.
    pub async fn complete_json(
        &self,
        conversation: Conversation,
    ) -> TwisterResult<(Map<String, Value>, Conversation)> {
        let payload = self.send(&conversation, true).await?;
        let object = extraction::parse_object(&payload)?;
        let conversation = conversation.with(Message::assistant(payload));
        Ok((object, conversation))
    }

    /// One-shot passthrough: a single user turn, raw assistant content back.
    ///
    /// JSON mode prepends the system turn and requires an object in reply.
    pub async fn complete_once(&self, prompt: &str, json_mode: bool) -> TwisterResult<String> {
        let conversation = self.opening(json_mode).with(Message::user(prompt));
        let (payload, _) = self.complete(conversation, json_mode).await?;
        Ok(payload)
    }

    async fn send(&self, conversation: &Conversation, json_mode: bool) -> TwisterResult<String> {
        let request = GenerateRequest::builder()
            .messages(conversation.messages().to_vec())
            .json_mode(json_mode)
            .build()
            .map_err(|e| ValidationError::from(e.to_string()))?;

        let response = self.driver.generate(&request).await?;
        let payload = response
            .text()
            .ok_or_else(|| TransportError::new(TransportErrorKind::EmptyChoice))?;

        debug!(payload_len = payload.len(), "Completion payload received");
        Ok(payload)
    }
}
