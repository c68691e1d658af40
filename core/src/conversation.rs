//! Conversation Transcript
//!
//! The append-only message log for a chat session between the user and the
//! simulated assistant.
//!
//! # Design Philosophy
//!
//! A conversation is never empty: it is seeded at construction with exactly
//! one system welcome message, and an explicit reset returns it to that
//! one-element state. Message ids come from a monotonic per-conversation
//! counter, so they are pairwise unique and strictly increasing in append
//! order - the id is both identity and sort key. The counter is never
//! rewound, not even by a reset.

use serde::{Deserialize, Serialize};

use crate::messages::{MessageId, MessageRole};

/// The fixed system greeting present at session start and after a reset.
pub const SEED_MESSAGE: &str =
    "Hello! I'm NextGenCreator, an AI assistant. How can I help you today?";

/// A message in the conversation
///
/// Immutable once created; the transcript only ever appends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID, strictly increasing in append order
    pub id: MessageId,
    /// Who sent this message
    pub role: MessageRole,
    /// Message content (non-empty)
    pub content: String,
    /// When the message was created (Unix timestamp ms)
    pub timestamp: u64,
}

/// An ordered conversation transcript
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Conversation {
    /// Conversation history, in append order
    messages: Vec<Message>,
    /// Next message id to allocate
    next_id: u64,
}

impl Conversation {
    /// Create a new conversation, seeded with the welcome message
    pub fn new() -> Self {
        let mut conversation = Self {
            messages: Vec::new(),
            next_id: 0,
        };
        conversation.push(MessageRole::System, SEED_MESSAGE.to_string());
        conversation
    }

    /// Append a user message, returning its id
    pub fn push_user(&mut self, content: String) -> MessageId {
        self.push(MessageRole::User, content)
    }

    /// Append an assistant message, returning its id
    pub fn push_assistant(&mut self, content: String) -> MessageId {
        self.push(MessageRole::Assistant, content)
    }

    /// Append a system message, returning its id
    pub fn push_system(&mut self, content: String) -> MessageId {
        self.push(MessageRole::System, content)
    }

    fn push(&mut self, role: MessageRole, content: String) -> MessageId {
        debug_assert!(!content.is_empty(), "transcript messages are non-empty");
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(Message {
            id,
            role,
            content,
            timestamp: now_ms(),
        });
        id
    }

    /// Reset the transcript to exactly the one-element seed sequence
    ///
    /// Idempotent in content: repeated resets yield the same transcript.
    /// The id counter keeps advancing so ids stay unique across the
    /// conversation's lifetime.
    pub fn reset(&mut self) {
        let removed = self.messages.len();
        self.messages.clear();
        self.push(MessageRole::System, SEED_MESSAGE.to_string());
        tracing::debug!(removed, "Reset conversation to seed message");
    }

    /// Get message by ID
    pub fn get_message(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Get all messages, in display order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Get the most recent message
    pub fn last_message(&self) -> &Message {
        // Invariant: the transcript is never empty
        self.messages.last().expect("conversation is seeded")
    }

    /// Get current message count
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Get current timestamp in milliseconds
fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
