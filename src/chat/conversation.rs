//! The session-scoped conversation store.
//!
//! An ordered, append-only, in-memory sequence of role-tagged messages. One
//! store exists per interactive session and dies with it; the only mutations
//! are appends and an explicit full clear. Tool-call records never appear
//! here; tool interaction is internal to a turn.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a rendered chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single rendered chat message, immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// The conversation history for one interactive session.
pub struct Conversation {
    id: Uuid,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Create an empty conversation with a fresh session id
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Append a message to the end of the history
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Remove all messages; the session id is retained
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// The full history in chronological order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
