//! Surface Events
//!
//! Events sent from UI surfaces to the Controller. These represent all the
//! ways a UI can communicate user actions to the conversation core.
//!
//! # Design Philosophy
//!
//! UI surfaces are "dumb" renderers that forward user actions to the
//! Controller. They don't interpret what actions mean - they just report
//! what happened. The Controller decides how to respond.

use serde::{Deserialize, Serialize};

use crate::messages::EventId;

/// Events from UI Surface to Controller
///
/// These events tell the Controller what the user is doing. The Controller
/// responds with `ControllerMessage`s.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SurfaceEvent {
    /// Surface connected to the Controller
    Connected {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// Surface type identifier
        surface_type: SurfaceType,
    },

    /// Surface disconnecting gracefully
    Disconnected {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// Reason for disconnect (optional)
        reason: Option<String>,
    },

    /// User submitted a message from the input form
    UserMessage {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// The raw input content (trimming happens in the Controller)
        content: String,
    },

    /// User requested the conversation be reset to the seed message
    ClearRequested {
        /// Event ID for acknowledgment
        event_id: EventId,
    },

    /// User requested quit
    QuitRequested {
        /// Event ID for acknowledgment
        event_id: EventId,
    },
}

impl SurfaceEvent {
    /// Generate a new event ID for this event
    pub fn new_event_id() -> EventId {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        EventId(format!("evt_{id}"))
    }

    /// Get the event ID of this event
    pub fn event_id(&self) -> &EventId {
        match self {
            Self::Connected { event_id, .. }
            | Self::Disconnected { event_id, .. }
            | Self::UserMessage { event_id, .. }
            | Self::ClearRequested { event_id }
            | Self::QuitRequested { event_id } => event_id,
        }
    }
}

/// Type of UI surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceType {
    /// Terminal UI (ratatui/crossterm)
    Tui,
    /// Headless (for testing/automation)
    Headless,
    /// Custom surface type
    Custom(String),
}

impl SurfaceType {
    /// Human-readable name
    pub fn name(&self) -> &str {
        match self {
            Self::Tui => "Terminal",
            Self::Headless => "Headless",
            Self::Custom(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_unique() {
        let id1 = SurfaceEvent::new_event_id();
        let id2 = SurfaceEvent::new_event_id();
        assert_ne!(id1.0, id2.0);
    }

    #[test]
    fn test_event_id_accessor() {
        let event = SurfaceEvent::UserMessage {
            event_id: EventId("evt_test".to_string()),
            content: "hello".to_string(),
        };
        assert_eq!(event.event_id().0, "evt_test");
    }

    #[test]
    fn test_surface_type_name() {
        assert_eq!(SurfaceType::Tui.name(), "Terminal");
        assert_eq!(SurfaceType::Headless.name(), "Headless");
        assert_eq!(SurfaceType::Custom("MyUI".to_string()).name(), "MyUI");
    }
}
