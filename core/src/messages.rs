//! Controller Messages
//!
//! Messages sent from the Controller to UI surfaces. These represent all the
//! ways the conversation core can communicate with any connected UI (TUI,
//! `WebUI`, GUI, etc.).
//!
//! # Design Philosophy
//!
//! The Controller owns the transcript and the reply timing; surfaces are pure
//! renderers that display what the Controller tells them to. This separation
//! enables:
//!
//! - Hot-swappable UI surfaces (the core has no rendering knowledge)
//! - Headless operation for testing and automation
//! - Clean separation of concerns

use serde::{Deserialize, Serialize};

/// Messages from Controller to UI Surface
///
/// These messages tell the UI what to display. The UI should not have any
/// conversation logic - just render what it's told.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerMessage {
    /// A complete message to display, in transcript order
    Message {
        /// Unique message ID; doubles as the transcript sort key
        id: MessageId,
        /// Who sent this message
        role: MessageRole,
        /// The message content
        content: String,
    },

    /// Whether a simulated reply is currently pending
    Composing {
        /// True while at least one reply timer is outstanding
        active: bool,
    },

    /// Controller state change
    State {
        /// The new state
        state: ControllerState,
    },

    /// The transcript was reset to the seed message
    ///
    /// The seed message is re-sent as a normal `Message` immediately after.
    Cleared,

    /// System notification
    Notify {
        /// Notification level
        level: NotifyLevel,
        /// Message content
        message: String,
    },

    /// Acknowledgment of a received surface event
    Ack {
        /// Event ID being acknowledged
        event_id: EventId,
    },

    /// Request surface to quit
    Quit {
        /// Optional goodbye message
        message: Option<String>,
    },
}

/// Message identifier
///
/// Allocated by the owning [`Conversation`](crate::conversation::Conversation)
/// from a monotonic counter, so ids are pairwise unique and strictly
/// increasing in append order. Display order == id order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "msg_{}", self.0)
    }
}

/// Event identifier (for acks)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

/// Who sent a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// User input
    User,
    /// The simulated assistant (NextGenCreator)
    Assistant,
    /// System message (the seed greeting)
    System,
}

/// Notification levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
}

/// Controller operational states
///
/// The conversation is a two-state machine: either no reply is pending, or
/// at least one is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerState {
    /// Ready for input, no reply pending
    Idle,
    /// At least one simulated reply timer is outstanding
    AwaitingReply,
}

impl ControllerState {
    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::AwaitingReply => "AI is typing...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_ordering() {
        assert!(MessageId(0) < MessageId(1));
        assert!(MessageId(41) < MessageId(42));
        assert_eq!(MessageId(7), MessageId(7));
    }

    #[test]
    fn test_message_id_display() {
        assert_eq!(MessageId(3).to_string(), "msg_3");
    }

    #[test]
    fn test_message_wire_shape() {
        // A future remote surface reuses these types verbatim, so the wire
        // shape is part of the contract.
        let msg = ControllerMessage::Message {
            id: MessageId(1),
            role: MessageRole::User,
            content: "hi".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"Message\""));

        let back: ControllerMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn test_controller_state_description() {
        assert_eq!(ControllerState::Idle.description(), "Ready");
        assert_eq!(ControllerState::AwaitingReply.description(), "AI is typing...");
    }
}
