//! Message types for conversation history.

use crate::Role;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// A single role-tagged turn in a conversation.
///
/// # Examples
///
/// ```
/// use twister_core::{Message, Role};
///
/// let message = Message::user("Tell me a story");
/// assert_eq!(message.role, Role::User);
/// assert_eq!(message.content, "Tell me a story");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(setter(into))]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// Text content of the turn
    pub content: String,
}

impl Message {
    /// Create a message with an explicit role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// A system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// A user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// An assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}
