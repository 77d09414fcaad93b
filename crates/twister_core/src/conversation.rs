//! Conversation history threaded down one branch of a story tree.

use crate::{Message, Role};
use serde::{Deserialize, Serialize};

/// Ordered sequence of role-tagged turns.
///
/// Every recursive expansion owns its own copy. Extending a conversation
/// never mutates the original, so sibling branches can run concurrently
/// without sharing any conversation state.
///
/// # Examples
///
/// ```
/// use twister_core::{Conversation, Message};
///
/// let base = Conversation::new().with(Message::system("Output JSON."));
/// let branch = base.with(Message::user("Continue twist 0"));
///
/// assert_eq!(base.len(), 1);
/// assert_eq!(branch.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation(Vec<Message>);

impl Conversation {
    /// An empty conversation.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a turn in place.
    pub fn push(&mut self, message: Message) {
        self.0.push(message);
    }

    /// A copy of this conversation extended by one turn.
    pub fn with(&self, message: Message) -> Self {
        let mut extended = self.clone();
        extended.push(message);
        extended
    }

    /// The turns, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    /// The most recent turn authored by `role`.
    pub fn last_of(&self, role: Role) -> Option<&Message> {
        self.0.iter().rev().find(|m| m.role == role)
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no turns.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self(messages)
    }
}

impl From<Conversation> for Vec<Message> {
    fn from(conversation: Conversation) -> Self {
        conversation.0
    }
}
