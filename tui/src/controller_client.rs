//! Controller Client
//!
//! Thin wrapper around the Controller for TUI integration. This client
//! embeds the Controller directly (no network) and provides a convenient
//! interface for sending events and receiving messages.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any conversation logic.
//! All of that happens in the Controller. The TUI's job is:
//! 1. Convert terminal events to SurfaceEvents
//! 2. Send SurfaceEvents to the Controller
//! 3. Receive ControllerMessages
//! 4. Render display state based on messages

use tokio::sync::mpsc;

use nextgen_core::{
    Controller, ControllerConfig, ControllerMessage, ControllerState, ScriptedResponder,
    SurfaceEvent, SurfaceType,
};

/// Client for communicating with the embedded Controller
pub struct ControllerClient {
    /// The embedded Controller instance
    controller: Controller<ScriptedResponder>,
    /// Receiver for messages from the Controller
    rx: mpsc::Receiver<ControllerMessage>,
}

impl ControllerClient {
    /// Create a new ControllerClient with an embedded Controller
    pub fn new() -> Self {
        // Channel for Controller -> TUI messages
        let (tx, rx) = mpsc::channel(100);

        let config = ControllerConfig::from_env();

        // Responder delay bounds come from the config; bad overrides fall
        // back to the defaults rather than aborting the UI.
        let responder = match ScriptedResponder::new()
            .with_delay_range(config.reply_delay_min_ms, config.reply_delay_max_ms)
        {
            Ok(responder) => responder,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring reply delay override");
                ScriptedResponder::new()
            }
        };

        let controller = Controller::new(responder, config, tx);

        Self { controller, rx }
    }

    /// Connect this surface to the Controller
    pub async fn connect(&mut self) -> anyhow::Result<()> {
        let event = SurfaceEvent::Connected {
            event_id: SurfaceEvent::new_event_id(),
            surface_type: SurfaceType::Tui,
        };
        self.controller.handle_event(event).await
    }

    /// Send a user message to the Controller
    pub async fn send_message(&mut self, content: String) -> anyhow::Result<()> {
        let event = SurfaceEvent::UserMessage {
            event_id: SurfaceEvent::new_event_id(),
            content,
        };
        self.controller.handle_event(event).await
    }

    /// Ask the Controller to reset the conversation
    pub async fn request_clear(&mut self) -> anyhow::Result<()> {
        let event = SurfaceEvent::ClearRequested {
            event_id: SurfaceEvent::new_event_id(),
        };
        self.controller.handle_event(event).await
    }

    /// Notify the Controller that the user wants to quit
    pub async fn request_quit(&mut self) -> anyhow::Result<()> {
        let event = SurfaceEvent::QuitRequested {
            event_id: SurfaceEvent::new_event_id(),
        };
        self.controller.handle_event(event).await
    }

    /// Poll for landed replies (must be called regularly)
    pub async fn poll_replies(&mut self) -> bool {
        self.controller.poll_replies().await
    }

    /// Try to receive a message from the Controller (non-blocking)
    pub fn try_recv(&mut self) -> Option<ControllerMessage> {
        self.rx.try_recv().ok()
    }

    /// Receive all pending messages from the Controller (non-blocking)
    pub fn recv_all(&mut self) -> Vec<ControllerMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Get the current Controller state
    pub fn state(&self) -> ControllerState {
        self.controller.state()
    }

    /// Whether a simulated reply is pending
    pub fn composing(&self) -> bool {
        self.controller.composing()
    }
}

impl Default for ControllerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nextgen_core::MessageRole;

    #[tokio::test]
    async fn test_connect_replays_seed() {
        let mut client = ControllerClient::new();
        client.connect().await.unwrap();

        let messages = client.recv_all();
        assert!(messages.iter().any(|m| matches!(
            m,
            ControllerMessage::Message {
                role: MessageRole::System,
                ..
            }
        )));
    }

    #[tokio::test]
    async fn test_send_message_echoes_user_text() {
        let mut client = ControllerClient::new();
        client.send_message("hi there".to_string()).await.unwrap();

        let messages = client.recv_all();
        assert!(messages.iter().any(|m| matches!(
            m,
            ControllerMessage::Message {
                role: MessageRole::User,
                content,
                ..
            } if content == "hi there"
        )));
        assert!(client.composing());
    }
}
