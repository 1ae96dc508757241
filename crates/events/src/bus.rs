//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] fans out [`SessionEvent`]s to any number of subscribers.
//! It is shared via `Arc<EventBus>` between the session actor and the
//! front-end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::status::AutosaveState;

// ---------------------------------------------------------------------------
// SessionEvent
// ---------------------------------------------------------------------------

/// What happened in the editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEventKind {
    /// The autosave indicator changed.
    StatusChanged { state: AutosaveState },
    /// A document was loaded (or defaulted) for `stem`.
    DocumentLoaded { stem: String },
    /// The document for `stem` reached the store.
    Saved { stem: String },
    /// A write for `stem` failed; `message` is for logs and tooltips.
    SaveFailed { stem: String, message: String },
    /// The saved annotation for `stem` was removed.
    Deleted { stem: String },
    /// Removing the saved annotation for `stem` failed.
    DeleteFailed { stem: String, message: String },
}

/// A [`SessionEventKind`] stamped with the time it was published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    #[serde(flatten)]
    pub kind: SessionEventKind,
    pub timestamp: DateTime<Utc>,
}

impl SessionEvent {
    pub fn new(kind: SessionEventKind) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// ```rust
/// use mp4label_events::{AutosaveState, EventBus, SessionEventKind};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(SessionEventKind::StatusChanged { state: AutosaveState::Saved });
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest events are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, kind: SessionEventKind) {
        // A send error only means nobody is listening.
        let _ = self.sender.send(SessionEvent::new(kind));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
