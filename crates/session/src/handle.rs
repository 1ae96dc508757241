use std::sync::Arc;

use mp4label_events::{EventBus, SessionEvent};
use mp4label_sync::SyncClient;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::action::{Action, SessionSnapshot};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::session::{EditingSession, Request};

/// Bounded request queue between front-ends and the session task.
const REQUEST_CHANNEL_CAPACITY: usize = 64;

/// Cloneable front for a running editing session.
///
/// Actions are applied in the order they are received. Dropping every
/// handle, or calling [`shutdown`](Self::shutdown), stops the session
/// after it flushes pending edits.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    requests: mpsc::Sender<Request>,
    bus: Arc<EventBus>,
    cancel: CancellationToken,
}

impl SessionHandle {
    /// Start a session task. The returned `JoinHandle` completes once the
    /// final flush has finished.
    pub fn spawn(config: &SessionConfig, client: SyncClient) -> (Self, JoinHandle<()>) {
        let bus = Arc::new(EventBus::default());
        let (requests, receiver) = mpsc::channel(REQUEST_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();

        let session = EditingSession::new(config, client, Arc::clone(&bus));
        let task = tokio::spawn(session.run(receiver, cancel.clone()));

        tracing::info!(
            autosave_delay_ms = config.autosave_delay.as_millis() as u64,
            "Editing session started"
        );

        (
            Self {
                requests,
                bus,
                cancel,
            },
            task,
        )
    }

    /// Apply `action` and return the session state after it.
    pub async fn dispatch(&self, action: Action) -> Result<SessionSnapshot, SessionError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(Request::Dispatch { action, reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)?
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(Request::Snapshot { reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)
    }

    /// Receive status and persistence events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.bus.subscribe()
    }

    /// Ask the session to flush and stop.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}
