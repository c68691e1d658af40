//! NextGen Core - Headless Conversation Core for a Simulated AI Chat
//!
//! This crate provides the conversation logic for NextGenCreator, completely
//! independent of any UI framework. It can drive a TUI, web UI, native GUI,
//! or run headless for testing.
//!
//! There is no language model behind it: replies are one of five fixed
//! sentence frames with the user's text interpolated, delivered after a
//! randomized delay. What remains is the part worth getting right - an
//! append-only transcript, a composing flag derived from pending reply
//! timers, and a surface protocol.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      UI Surfaces                         │
//! │   ┌─────────┐   ┌──────────┐   ┌─────────────────────┐  │
//! │   │   TUI   │   │  WebUI   │   │      Headless       │  │
//! │   │(ratatui)│   │ (future) │   │  (tests/automation) │  │
//! │   └────┬────┘   └────┬─────┘   └──────────┬──────────┘  │
//! │        └─────────────┴────────────────────┘             │
//! │                      │                                   │
//! │               SurfaceEvent (up)                          │
//! │             ControllerMessage (down)                     │
//! │                      │                                   │
//! └──────────────────────┼───────────────────────────────────┘
//!                        │
//! ┌──────────────────────┼───────────────────────────────────┐
//! │                 CONVERSATION CORE                         │
//! │  ┌───────────────────┴────────────────────────────────┐  │
//! │  │                   Controller                        │  │
//! │  │  ┌──────────────┐  ┌───────────────┐  ┌──────────┐ │  │
//! │  │  │ Conversation │  │ Pending-reply │  │Responder │ │  │
//! │  │  │ (transcript) │  │    tokens     │  │ (timers) │ │  │
//! │  │  └──────────────┘  └───────────────┘  └──────────┘ │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Controller`]: owns the transcript and the reply timing contract
//! - [`ControllerMessage`]: messages sent from Controller to UI surfaces
//! - [`SurfaceEvent`]: events sent from UI surfaces to the Controller
//! - [`Conversation`]: the seeded, append-only transcript
//! - [`ScriptedResponder`]: the template-based reply engine
//!
//! # Quick Start
//!
//! ```ignore
//! use nextgen_core::{Controller, ControllerConfig, ScriptedResponder, SurfaceEvent, SurfaceType};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (tx, mut rx) = mpsc::channel(100);
//!     let mut controller = Controller::new(
//!         ScriptedResponder::new(),
//!         ControllerConfig::from_env(),
//!         tx,
//!     );
//!
//!     controller.handle_event(SurfaceEvent::Connected {
//!         event_id: SurfaceEvent::new_event_id(),
//!         surface_type: SurfaceType::Headless,
//!     }).await?;
//!
//!     loop {
//!         // Render messages from the controller
//!         while let Ok(msg) = rx.try_recv() { /* ... */ }
//!
//!         // Let landed replies append
//!         controller.poll_replies().await;
//!
//!         // Forward user input as SurfaceEvents
//!     }
//! }
//! ```
//!
//! # No UI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework. It's pure conversation logic that can be used anywhere.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod controller;
pub mod conversation;
pub mod events;
pub mod messages;
pub mod responder;

// Re-exports for convenience
pub use controller::{
    Controller, ControllerConfig, ControllerLimits, InputValidator, ValidationResult,
};
pub use conversation::{Conversation, Message, SEED_MESSAGE};
pub use events::{SurfaceEvent, SurfaceType};
pub use messages::{
    ControllerMessage, ControllerState, EventId, MessageId, MessageRole, NotifyLevel,
};
pub use responder::{
    render_response, responses_for, Reply, ReplyRequest, Responder, ResponderError,
    ScriptedResponder, REPLY_DELAY_MAX_MS, REPLY_DELAY_MIN_MS, RESPONSE_TEMPLATE_COUNT,
};
