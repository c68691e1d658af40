//! Reply Engine
//!
//! The simulated assistant behind the conversation. There is no language
//! model here: a reply is one of five fixed sentence frames with the user's
//! text interpolated verbatim, delivered after a randomized delay.
//!
//! # Design Philosophy
//!
//! The [`Responder`] trait is the seam where a real backend would plug in
//! without changing controller logic. [`ScriptedResponder`] implements it
//! with no I/O at all: it draws a delay, spawns a timer task, and sends the
//! rendered reply over a channel once the timer fires. The randomness is an
//! injectable seedable source so tests can assert exact template and delay
//! choices deterministically.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tokio::sync::oneshot;

/// Lower bound of the reply delay, inclusive (milliseconds)
pub const REPLY_DELAY_MIN_MS: f64 = 1000.0;

/// Upper bound of the reply delay, exclusive (milliseconds)
pub const REPLY_DELAY_MAX_MS: f64 = 3000.0;

/// Number of fixed response templates
pub const RESPONSE_TEMPLATE_COUNT: usize = 5;

/// Render the response template at `index` with the user's text interpolated
///
/// `index` is taken modulo [`RESPONSE_TEMPLATE_COUNT`].
#[must_use]
pub fn render_response(index: usize, input: &str) -> String {
    match index % RESPONSE_TEMPLATE_COUNT {
        0 => format!("That's an interesting point about \"{input}\". Let me elaborate..."),
        1 => format!("I understand you're asking about \"{input}\". Here's what I know..."),
        2 => format!("Regarding \"{input}\", there are several factors to consider..."),
        3 => format!("Your question about \"{input}\" is quite complex. Let's break it down..."),
        _ => format!("I'm glad you asked about \"{input}\". Here's my analysis..."),
    }
}

/// All five responses rendered for a given input
///
/// Useful for asserting that a reply matches one of the fixed frames.
#[must_use]
pub fn responses_for(input: &str) -> [String; RESPONSE_TEMPLATE_COUNT] {
    std::array::from_fn(|index| render_response(index, input))
}

/// A request for a simulated reply
#[derive(Clone, Debug)]
pub struct ReplyRequest {
    /// The trimmed user text the reply elaborates on
    pub prompt: String,
}

impl ReplyRequest {
    /// Create a new request for the given (already trimmed) user text
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// A completed simulated reply
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    /// The rendered reply text
    pub content: String,
}

/// Errors from configuring or running a responder
#[derive(Debug, Error)]
pub enum ResponderError {
    /// The configured delay bounds do not form a half-open range
    #[error("invalid reply delay range: [{min_ms}, {max_ms}) ms")]
    InvalidDelayRange {
        /// Configured lower bound (inclusive)
        min_ms: f64,
        /// Configured upper bound (exclusive)
        max_ms: f64,
    },
}

/// Reply engine trait
///
/// Implement this to swap the scripted simulator for a real backend. The
/// returned receiver resolves once the reply is ready; dropping it does not
/// cancel the underlying timer.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Get the responder name (e.g. "Scripted")
    fn name(&self) -> &str;

    /// Begin composing a reply, fire-and-forget
    ///
    /// Returns the receiving half of a channel that yields the reply after
    /// the responder's delay has elapsed.
    async fn begin_reply(&self, request: &ReplyRequest) -> anyhow::Result<oneshot::Receiver<Reply>>;
}

/// The scripted reply engine
///
/// Picks a delay uniformly at random from a half-open range (by default
/// [1000, 3000) ms), sleeps, then picks one of the five response templates
/// uniformly at random. Template selection happens after the delay elapses.
#[derive(Clone)]
pub struct ScriptedResponder {
    /// Delay lower bound, inclusive (milliseconds)
    delay_min_ms: f64,
    /// Delay upper bound, exclusive (milliseconds)
    delay_max_ms: f64,
    /// Shared random source; seedable for deterministic tests
    rng: Arc<Mutex<StdRng>>,
}

impl ScriptedResponder {
    /// Create a responder with entropy-seeded randomness and default delays
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Create a responder with a fixed seed, for deterministic tests
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Override the delay range (milliseconds, half-open)
    pub fn with_delay_range(mut self, min_ms: f64, max_ms: f64) -> Result<Self, ResponderError> {
        if !(min_ms >= 0.0 && min_ms < max_ms) {
            return Err(ResponderError::InvalidDelayRange { min_ms, max_ms });
        }
        self.delay_min_ms = min_ms;
        self.delay_max_ms = max_ms;
        Ok(self)
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            delay_min_ms: REPLY_DELAY_MIN_MS,
            delay_max_ms: REPLY_DELAY_MAX_MS,
            rng: Arc::new(Mutex::new(rng)),
        }
    }
}

impl Default for ScriptedResponder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Responder for ScriptedResponder {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn begin_reply(&self, request: &ReplyRequest) -> anyhow::Result<oneshot::Receiver<Reply>> {
        let (tx, rx) = oneshot::channel();

        let delay_ms = self
            .rng
            .lock()
            .gen_range(self.delay_min_ms..self.delay_max_ms);
        let delay = Duration::from_secs_f64(delay_ms / 1000.0);
        let prompt = request.prompt.clone();
        let rng = Arc::clone(&self.rng);

        tracing::debug!(delay_ms, "Scheduled simulated reply");

        // The timer always fires and always delivers; nothing cancels it.
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let index = rng.lock().gen_range(0..RESPONSE_TEMPLATE_COUNT);
            let reply = Reply {
                content: render_response(index, &prompt),
            };
            if tx.send(reply).is_err() {
                tracing::debug!("Reply receiver dropped before the timer fired");
            }
        });

        Ok(rx)
    }
}
