//! # Event Bus System
//!
//! Decoupled progress reporting over `tokio::sync::broadcast`. Modules emit
//! typed events; any number of subscribers (CLI output, tests) listen
//! independently.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::events::{AuthEvent, CoreEvent, EventBus};
//!
//! let event_bus = EventBus::new(100);
//! let mut stream = event_bus.subscribe();
//!
//! event_bus.emit(CoreEvent::Auth(AuthEvent::SigningIn));
//! assert_eq!(
//!     stream.try_recv().unwrap(),
//!     CoreEvent::Auth(AuthEvent::SigningIn)
//! );
//! ```
//!
//! ## Error Handling
//!
//! Subscribers receive `RecvError::Lagged(n)` when they fall behind (non
//! fatal, keep receiving) and `RecvError::Closed` when every sender is gone
//! (shutdown signal). Emitting with no live subscriber is not an error.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Authentication-related events
    Auth(AuthEvent),
    /// Like-tracking events
    Tracker(TrackerEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Auth(e) => e.description(),
            CoreEvent::Tracker(e) => e.description(),
        }
    }
}

/// Events related to credential acquisition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum AuthEvent {
    /// Interactive authorization flow in progress.
    SigningIn,
    /// A cached credential passed introspection and will be reused.
    CacheHit {
        /// Owner of the cached credential.
        user_id: i64,
    },
    /// Authorization completed and a fresh credential was issued.
    SignedIn {
        /// Owner of the new credential.
        user_id: i64,
    },
    /// Authorization failed.
    AuthError {
        /// Human-readable error message.
        message: String,
    },
}

impl AuthEvent {
    fn description(&self) -> &str {
        match self {
            AuthEvent::SigningIn => "Authorization in progress",
            AuthEvent::CacheHit { .. } => "Cached credential accepted",
            AuthEvent::SignedIn { .. } => "Authorized successfully",
            AuthEvent::AuthError { .. } => "Authorization error",
        }
    }
}

/// Events related to the like lookup itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum TrackerEvent {
    /// Target screen name resolved to a numeric user id.
    TargetResolved {
        /// Screen name from the task configuration.
        screen_name: String,
        /// Resolved numeric id.
        user_id: i64,
    },
    /// Like lookup finished.
    Checked {
        /// Whether the target user liked the post.
        liked: bool,
    },
}

impl TrackerEvent {
    fn description(&self) -> &str {
        match self {
            TrackerEvent::TargetResolved { .. } => "Target resolved",
            TrackerEvent::Checked { .. } => "Like lookup finished",
        }
    }
}

/// Central event bus for publishing and subscribing to [`CoreEvent`]s.
///
/// Cheap to clone; all clones share the same underlying channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all current subscribers.
    ///
    /// Fire-and-forget: an event with no subscribers is silently dropped.
    pub fn emit(&self, event: CoreEvent) {
        trace!(event = event.description(), "Emitting event");
        let _ = self.sender.send(event);
    }

    /// Creates a new subscription to the event stream.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}
