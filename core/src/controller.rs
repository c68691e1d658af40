//! Controller - The Conversation Core
//!
//! The Controller owns the transcript and the reply timing contract. It
//! orchestrates:
//! - The append-only conversation transcript
//! - Scheduling of simulated assistant replies
//! - Communication with UI surfaces
//!
//! # Design Philosophy
//!
//! The Controller is UI-agnostic. It doesn't know or care whether it's
//! talking to a TUI, a web page, or a test harness. It communicates through:
//! - `ControllerMessage`: Messages sent TO the UI surface
//! - `SurfaceEvent`: Events received FROM the UI surface
//!
//! Replies are fire-and-forget: submitting a message inserts a pending
//! token and starts a timer; the timer always fires and always appends,
//! even if the conversation was cleared in the interim. The composing flag
//! is derived from the pending-token set, so overlapping in-flight replies
//! are represented correctly and the flag only clears when no reply is
//! outstanding.

use std::collections::HashSet;

use tokio::sync::{mpsc, oneshot};

use crate::conversation::Conversation;
use crate::events::{SurfaceEvent, SurfaceType};
use crate::messages::{ControllerMessage, ControllerState, EventId, MessageId, MessageRole, NotifyLevel};
use crate::responder::{Reply, ReplyRequest, Responder};

/// Configuration limits for the Controller
///
/// The surface boundary is the only place untrusted input enters the
/// system; these limits keep it bounded.
#[derive(Clone, Debug)]
pub struct ControllerLimits {
    /// Maximum size of a single message in bytes (default: 100KB)
    pub max_message_size: usize,
}

impl Default for ControllerLimits {
    fn default() -> Self {
        Self {
            max_message_size: 100 * 1024, // 100KB
        }
    }
}

impl ControllerLimits {
    /// Create limits from environment variables with fallback to defaults
    #[must_use]
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_message_size: std::env::var("NEXTGEN_MAX_MESSAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_message_size),
        }
    }
}

/// Controller configuration
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Goodbye message sent with `Quit`; `None` lets the surface pick one
    pub goodbye: Option<String>,
    /// Reply delay lower bound (milliseconds, inclusive)
    ///
    /// Consumed by the embedding surface when it constructs the responder.
    pub reply_delay_min_ms: f64,
    /// Reply delay upper bound (milliseconds, exclusive)
    pub reply_delay_max_ms: f64,
    /// Input limits
    pub limits: ControllerLimits,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            goodbye: None,
            reply_delay_min_ms: crate::responder::REPLY_DELAY_MIN_MS,
            reply_delay_max_ms: crate::responder::REPLY_DELAY_MAX_MS,
            limits: ControllerLimits::default(),
        }
    }
}

impl ControllerConfig {
    /// Create configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            goodbye: std::env::var("NEXTGEN_GOODBYE").ok().or(default.goodbye),
            reply_delay_min_ms: std::env::var("NEXTGEN_MIN_REPLY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.reply_delay_min_ms),
            reply_delay_max_ms: std::env::var("NEXTGEN_MAX_REPLY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.reply_delay_max_ms),
            limits: ControllerLimits::from_env(),
        }
    }
}

/// Result of input validation
#[derive(Clone, Debug)]
pub enum ValidationResult {
    /// Input is acceptable
    Valid,
    /// Input was rejected, with a reason shown to the user
    Invalid(String),
}

impl ValidationResult {
    /// Whether the input passed validation
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Validates user input at the surface boundary
///
/// Rejections are surfaced as a visible warning notice, never silently
/// dropped. The empty-after-trim no-op is not a rejection and stays silent.
#[derive(Clone, Debug)]
pub struct InputValidator {
    limits: ControllerLimits,
}

impl InputValidator {
    /// Create a validator with the given limits
    #[must_use]
    pub fn new(limits: ControllerLimits) -> Self {
        Self { limits }
    }

    /// Validate a user message
    pub fn validate_message(&self, content: &str) -> ValidationResult {
        if content.len() > self.limits.max_message_size {
            return ValidationResult::Invalid(format!(
                "Message too large: {} bytes (max: {})",
                content.len(),
                self.limits.max_message_size
            ));
        }

        // Control characters other than newline, tab, carriage return
        if content
            .chars()
            .any(|c| c.is_control() && c != '\n' && c != '\t' && c != '\r')
        {
            return ValidationResult::Invalid(
                "Message contains invalid control characters".to_string(),
            );
        }

        ValidationResult::Valid
    }
}

/// A scheduled reply that has not landed yet
struct InFlightReply {
    /// Id of the user message that triggered it
    trigger: MessageId,
    /// Receiving half of the responder's reply channel
    rx: oneshot::Receiver<Reply>,
}

/// The Controller - headless conversation core
pub struct Controller<R: Responder> {
    /// Configuration
    config: ControllerConfig,
    /// Reply engine
    responder: R,
    /// The transcript
    conversation: Conversation,
    /// Current operational state
    state: ControllerState,
    /// Channel to send messages to the UI surface
    tx: mpsc::Sender<ControllerMessage>,
    /// Connected surface info
    surface_type: Option<SurfaceType>,
    /// Replies scheduled but not yet landed
    in_flight: Vec<InFlightReply>,
    /// Pending-reply tokens, keyed by the triggering user message id
    ///
    /// Cleared by `clear_conversation`; the in-flight timers are not, so a
    /// stale reply still appends when it fires but can no longer hold the
    /// composing flag.
    pending: HashSet<MessageId>,
    /// Input validator for surface events
    input_validator: InputValidator,
}

impl<R: Responder> Controller<R> {
    /// Create a new Controller with the given responder
    pub fn new(responder: R, config: ControllerConfig, tx: mpsc::Sender<ControllerMessage>) -> Self {
        let input_validator = InputValidator::new(config.limits.clone());
        Self {
            config,
            responder,
            conversation: Conversation::new(),
            state: ControllerState::Idle,
            tx,
            surface_type: None,
            in_flight: Vec::new(),
            pending: HashSet::new(),
            input_validator,
        }
    }

    /// Get the transcript
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Get current state
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Whether at least one simulated reply is pending
    pub fn composing(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Handle an event from the UI surface
    ///
    /// Runs to completion before the caller can observe any other effect:
    /// a submitted message is appended and its timer registered
    /// synchronously with respect to the driving task.
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        match event {
            SurfaceEvent::Connected {
                event_id,
                surface_type,
            } => {
                tracing::info!(surface = surface_type.name(), "Surface connected");
                self.surface_type = Some(surface_type);
                self.ack(event_id).await;

                // A (re)connecting surface has no local transcript: send the
                // current state and replay every message, seed included.
                self.send(ControllerMessage::State { state: self.state })
                    .await;
                self.send(ControllerMessage::Composing {
                    active: self.composing(),
                })
                .await;
                self.replay_transcript().await;
            }

            SurfaceEvent::Disconnected { event_id, reason } => {
                if let Some(surface) = self.surface_type.take() {
                    tracing::info!(surface = surface.name(), ?reason, "Surface disconnected");
                }
                self.ack(event_id).await;
            }

            SurfaceEvent::UserMessage { event_id, content } => {
                self.ack(event_id).await;
                match self.input_validator.validate_message(&content) {
                    ValidationResult::Valid => {
                        self.submit_user_message(&content).await?;
                    }
                    ValidationResult::Invalid(reason) => {
                        tracing::warn!(reason = %reason, "Rejected user message");
                        self.notify(NotifyLevel::Warning, &format!("Invalid message: {reason}"))
                            .await;
                    }
                }
            }

            SurfaceEvent::ClearRequested { event_id } => {
                self.ack(event_id).await;
                self.clear_conversation().await;
            }

            SurfaceEvent::QuitRequested { event_id } => {
                self.ack(event_id).await;
                self.send(ControllerMessage::Quit {
                    message: self.config.goodbye.clone(),
                })
                .await;
            }
        }

        Ok(())
    }

    /// Accept a user message and schedule a simulated reply
    ///
    /// Empty-after-trim input is a silent no-op. Otherwise the trimmed text
    /// is appended as a user message (and emitted to the surface) before the
    /// reply is scheduled.
    pub async fn submit_user_message(&mut self, content: &str) -> anyhow::Result<()> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            tracing::debug!("Ignored empty user message");
            return Ok(());
        }

        let user_id = self.conversation.push_user(trimmed.to_string());
        self.send(ControllerMessage::Message {
            id: user_id,
            role: MessageRole::User,
            content: trimmed.to_string(),
        })
        .await;

        self.pending.insert(user_id);
        self.sync_composing().await;
        self.schedule_assistant_reply(user_id, trimmed).await;

        Ok(())
    }

    /// Start the reply timer for an accepted user message
    async fn schedule_assistant_reply(&mut self, trigger: MessageId, text: &str) {
        let request = ReplyRequest::new(text);
        match self.responder.begin_reply(&request).await {
            Ok(rx) => {
                self.in_flight.push(InFlightReply { trigger, rx });
            }
            Err(e) => {
                // The seam a real backend would fail through: surface the
                // error as a system message and release the pending token.
                tracing::error!(error = %e, "Responder failed to schedule a reply");
                let id = self.conversation.push_system(format!("Error: {e}"));
                self.send(ControllerMessage::Message {
                    id,
                    role: MessageRole::System,
                    content: format!("Error: {e}"),
                })
                .await;
                self.notify(NotifyLevel::Error, &format!("Failed to schedule reply: {e}"))
                    .await;
                self.pending.remove(&trigger);
                self.sync_composing().await;
            }
        }
    }

    /// Reset the transcript to the seed message
    ///
    /// Idempotent. Pending tokens are dropped, so composing is false
    /// immediately; in-flight timers are NOT cancelled, and a stale reply
    /// will still append when it fires.
    pub async fn clear_conversation(&mut self) {
        self.conversation.reset();
        self.pending.clear();
        self.sync_composing().await;

        self.send(ControllerMessage::Cleared).await;
        self.replay_transcript().await;
    }

    /// Poll for landed replies
    ///
    /// Call this regularly (once per frame tick). Returns true if there was
    /// activity.
    pub async fn poll_replies(&mut self) -> bool {
        let mut landed = Vec::new();
        let mut still_waiting = Vec::new();

        for mut entry in std::mem::take(&mut self.in_flight) {
            match entry.rx.try_recv() {
                Ok(reply) => landed.push((entry.trigger, reply)),
                Err(oneshot::error::TryRecvError::Empty) => still_waiting.push(entry),
                Err(oneshot::error::TryRecvError::Closed) => {
                    // Responder task died without delivering
                    tracing::warn!(trigger = %entry.trigger, "Reply channel closed without a reply");
                    self.pending.remove(&entry.trigger);
                }
            }
        }
        self.in_flight = still_waiting;

        if landed.is_empty() {
            return false;
        }

        for (trigger, reply) in landed {
            let id = self.conversation.push_assistant(reply.content.clone());
            self.send(ControllerMessage::Message {
                id,
                role: MessageRole::Assistant,
                content: reply.content,
            })
            .await;

            // A reply landing after a clear finds its token already gone and
            // cannot flip the composing flag.
            self.pending.remove(&trigger);
        }
        self.sync_composing().await;

        true
    }

    /// Re-send the whole transcript to the surface, in display order
    async fn replay_transcript(&self) {
        for msg in self.conversation.messages() {
            self.send(ControllerMessage::Message {
                id: msg.id,
                role: msg.role,
                content: msg.content.clone(),
            })
            .await;
        }
    }

    /// Derive state from the pending-token set, notifying the UI on change
    async fn sync_composing(&mut self) {
        let state = if self.pending.is_empty() {
            ControllerState::Idle
        } else {
            ControllerState::AwaitingReply
        };
        if state != self.state {
            self.set_state(state).await;
            self.send(ControllerMessage::Composing {
                active: state == ControllerState::AwaitingReply,
            })
            .await;
        }
    }

    /// Set state and notify UI
    async fn set_state(&mut self, state: ControllerState) {
        self.state = state;
        self.send(ControllerMessage::State { state }).await;
    }

    /// Send acknowledgment
    async fn ack(&self, event_id: EventId) {
        self.send(ControllerMessage::Ack { event_id }).await;
    }

    /// Send notification
    async fn notify(&self, level: NotifyLevel, message: &str) {
        self.send(ControllerMessage::Notify {
            level,
            message: message.to_string(),
        })
        .await;
    }

    /// Send a message to the UI surface
    async fn send(&self, msg: ControllerMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::SEED_MESSAGE;
    use crate::responder::ScriptedResponder;

    fn controller(
        seed: u64,
    ) -> (
        Controller<ScriptedResponder>,
        mpsc::Receiver<ControllerMessage>,
    ) {
        let (tx, rx) = mpsc::channel(100);
        let controller = Controller::new(
            ScriptedResponder::with_seed(seed),
            ControllerConfig::default(),
            tx,
        );
        (controller, rx)
    }

    #[tokio::test]
    async fn test_controller_creation() {
        let (controller, _rx) = controller(1);

        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(!controller.composing());
        assert_eq!(controller.conversation().message_count(), 1);
        assert_eq!(controller.conversation().last_message().content, SEED_MESSAGE);
    }

    #[tokio::test]
    async fn test_empty_input_is_a_silent_noop() {
        let (mut controller, mut rx) = controller(1);

        controller.submit_user_message("").await.unwrap();
        controller.submit_user_message("   \t\n  ").await.unwrap();

        assert_eq!(controller.conversation().message_count(), 1);
        assert!(!controller.composing());
        assert!(rx.try_recv().is_err(), "no message emitted for a no-op");
    }

    #[tokio::test]
    async fn test_submit_appends_and_sets_composing() {
        let (mut controller, mut rx) = controller(1);

        controller.submit_user_message("  hello  ").await.unwrap();

        assert_eq!(controller.conversation().message_count(), 2);
        let last = controller.conversation().last_message();
        assert_eq!(last.role, MessageRole::User);
        assert_eq!(last.content, "hello", "surrounding whitespace trimmed");
        assert!(controller.composing());
        assert_eq!(controller.state(), ControllerState::AwaitingReply);

        // The user message is emitted before anything else
        let msg = rx.recv().await.unwrap();
        assert!(matches!(
            msg,
            ControllerMessage::Message {
                role: MessageRole::User,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_oversized_message_rejected_with_notice() {
        let (tx, mut rx) = mpsc::channel(100);
        let config = ControllerConfig {
            limits: ControllerLimits {
                max_message_size: 8,
            },
            ..Default::default()
        };
        let mut controller = Controller::new(ScriptedResponder::with_seed(1), config, tx);

        controller
            .handle_event(SurfaceEvent::UserMessage {
                event_id: SurfaceEvent::new_event_id(),
                content: "way past the configured limit".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(controller.conversation().message_count(), 1);
        assert!(!controller.composing());

        // Ack first, then a visible warning
        assert!(matches!(
            rx.recv().await.unwrap(),
            ControllerMessage::Ack { .. }
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            ControllerMessage::Notify {
                level: NotifyLevel::Warning,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_control_characters_rejected() {
        let validator = InputValidator::new(ControllerLimits::default());
        assert!(!validator.validate_message("Hello\x00world").is_valid());
        assert!(validator.validate_message("Hello\nworld\ttab").is_valid());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_lands_and_composing_clears() {
        let (mut controller, _rx) = controller(42);

        controller.submit_user_message("hello").await.unwrap();
        assert!(controller.composing());

        // Past the upper delay bound the reply must have landed
        tokio::time::sleep(std::time::Duration::from_millis(3000)).await;
        assert!(controller.poll_replies().await);

        assert_eq!(controller.conversation().message_count(), 3);
        let last = controller.conversation().last_message();
        assert_eq!(last.role, MessageRole::Assistant);
        assert!(crate::responder::responses_for("hello").contains(&last.content));
        assert!(!controller.composing());
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let (mut controller, _rx) = controller(1);

        controller.submit_user_message("hello").await.unwrap();
        controller.clear_conversation().await;
        let first: Vec<_> = controller
            .conversation()
            .messages()
            .iter()
            .map(|m| (m.role, m.content.clone()))
            .collect();

        controller.clear_conversation().await;
        let second: Vec<_> = controller
            .conversation()
            .messages()
            .iter()
            .map(|m| (m.role, m.content.clone()))
            .collect();

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].1, SEED_MESSAGE);
        assert!(!controller.composing());
    }

    #[tokio::test]
    async fn test_quit_sends_goodbye() {
        let (tx, mut rx) = mpsc::channel(100);
        let config = ControllerConfig {
            goodbye: Some("See ya!".to_string()),
            ..Default::default()
        };
        let mut controller = Controller::new(ScriptedResponder::with_seed(1), config, tx);

        controller
            .handle_event(SurfaceEvent::QuitRequested {
                event_id: SurfaceEvent::new_event_id(),
            })
            .await
            .unwrap();

        assert!(matches!(
            rx.recv().await.unwrap(),
            ControllerMessage::Ack { .. }
        ));
        assert_eq!(
            rx.recv().await.unwrap(),
            ControllerMessage::Quit {
                message: Some("See ya!".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_connected_replays_transcript() {
        let (mut controller, mut rx) = controller(1);

        controller
            .handle_event(SurfaceEvent::Connected {
                event_id: SurfaceEvent::new_event_id(),
                surface_type: SurfaceType::Headless,
            })
            .await
            .unwrap();

        let mut messages = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            messages.push(msg);
        }

        // Ack, State, Composing, then the seed message replay
        assert!(matches!(messages[0], ControllerMessage::Ack { .. }));
        assert!(messages.iter().any(|m| matches!(
            m,
            ControllerMessage::Message {
                role: MessageRole::System,
                content,
                ..
            } if content == SEED_MESSAGE
        )));
    }
}
