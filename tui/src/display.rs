//! Display State Types
//!
//! Types that represent the current display state for the TUI. These are
//! derived from `ControllerMessage`s and used for rendering.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it just renders what the Controller tells it
//! to. Display state is the bridge between `ControllerMessage`s and
//! rendering; it holds no conversation logic of its own.

use nextgen_core::{ControllerMessage, ControllerState, MessageId, MessageRole, NotifyLevel};

/// A rendered conversation message
#[derive(Clone, Debug)]
pub struct DisplayMessage {
    /// Unique message ID
    pub id: MessageId,
    /// Who sent this message
    pub role: DisplayRole,
    /// The message content
    pub content: String,
}

/// Display role for messages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayRole {
    /// User input
    User,
    /// The simulated assistant
    Assistant,
    /// System message
    System,
}

impl From<MessageRole> for DisplayRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => DisplayRole::User,
            MessageRole::Assistant => DisplayRole::Assistant,
            MessageRole::System => DisplayRole::System,
        }
    }
}

impl DisplayRole {
    /// Get the prefix for this role
    pub fn prefix(&self) -> &'static str {
        match self {
            DisplayRole::User => "You: ",
            DisplayRole::Assistant => "NextGenCreator: ",
            DisplayRole::System => "",
        }
    }
}

/// Current display state, updated from controller messages
#[derive(Debug, Default)]
pub struct DisplayState {
    /// Transcript in display order
    pub messages: Vec<DisplayMessage>,
    /// Whether the "AI is typing..." indicator should show
    pub composing: bool,
    /// Last reported controller state (for the status bar)
    pub state: Option<ControllerState>,
    /// Last notification, if any (shown in the status bar)
    pub notice: Option<(NotifyLevel, String)>,
    /// Set once the controller asked the surface to quit
    pub quitting: bool,
    /// Goodbye message delivered with Quit, if any
    pub quit_message: Option<String>,
}

impl DisplayState {
    /// Create an empty display state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a controller message to update display state
    pub fn apply_message(&mut self, msg: ControllerMessage) {
        match msg {
            ControllerMessage::Message { id, role, content } => {
                // A transcript replay after reconnect may repeat ids
                if self.messages.iter().all(|m| m.id != id) {
                    self.messages.push(DisplayMessage {
                        id,
                        role: role.into(),
                        content,
                    });
                }
            }
            ControllerMessage::Composing { active } => {
                self.composing = active;
            }
            ControllerMessage::State { state } => {
                self.state = Some(state);
            }
            ControllerMessage::Cleared => {
                self.messages.clear();
                self.notice = None;
            }
            ControllerMessage::Notify { level, message } => {
                self.notice = Some((level, message));
            }
            ControllerMessage::Ack { .. } => {}
            ControllerMessage::Quit { message } => {
                self.quitting = true;
                self.quit_message = message;
            }
        }
    }

    /// Status bar text: the latest notice, or the controller state
    #[must_use]
    pub fn status_line(&self) -> String {
        if let Some((level, ref message)) = self.notice {
            let tag = match level {
                NotifyLevel::Info => "info",
                NotifyLevel::Warning => "warning",
                NotifyLevel::Error => "error",
            };
            return format!("[{tag}] {message}");
        }
        self.state
            .map(|s| s.description().to_string())
            .unwrap_or_default()
    }
}
