//! Shared fixtures for session integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mp4label_core::{AnnotationDocument, Step};
use mp4label_events::{SessionEvent, SessionEventKind};
use mp4label_session::{Action, SessionConfig, SessionHandle};
use mp4label_sync::{AnnotationStore, MemoryAnnotationStore, SyncClient, SyncError};
use tokio::sync::{broadcast, Semaphore};
use tokio::task::JoinHandle;

/// Store wrapper that records writes, can fail on demand and can hold
/// writes until the test releases them.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryAnnotationStore,
    writes: Mutex<Vec<(String, AnnotationDocument)>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
    fail: AtomicBool,
    gate: Option<Semaphore>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pre_annotation(stem: &str, doc: AnnotationDocument) -> Self {
        Self {
            inner: MemoryAnnotationStore::new().with_pre_annotation(stem, doc),
            ..Self::default()
        }
    }

    /// Writes block until [`release`](Self::release) hands out permits.
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn release(&self, writes: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(writes);
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn writes(&self) -> Vec<(String, AnnotationDocument)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnnotationStore for RecordingStore {
    async fn fetch(&self, stem: &str) -> Result<Option<AnnotationDocument>, SyncError> {
        self.inner.fetch(stem).await
    }

    async fn upsert(&self, stem: &str, doc: &AnnotationDocument) -> Result<(), SyncError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        let result = if self.fail.load(Ordering::SeqCst) {
            Err(SyncError::Api {
                status: 500,
                body: "store unavailable".into(),
            })
        } else {
            self.writes
                .lock()
                .unwrap()
                .push((stem.to_string(), doc.clone()));
            self.inner.upsert(stem, doc).await
        };

        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn remove(&self, stem: &str) -> Result<(), SyncError> {
        self.inner.remove(stem).await
    }

    async fn fetch_model(&self, stem: &str) -> Result<Option<AnnotationDocument>, SyncError> {
        self.inner.fetch_model(stem).await
    }
}

pub struct TestSession {
    pub handle: SessionHandle,
    pub task: JoinHandle<()>,
    pub store: Arc<RecordingStore>,
    pub events: broadcast::Receiver<SessionEvent>,
}

pub fn spawn_session(store: RecordingStore) -> TestSession {
    let store = Arc::new(store);
    let client = SyncClient::new(store.clone());
    let (handle, task) = SessionHandle::spawn(&SessionConfig::default(), client);
    let events = handle.subscribe();
    TestSession {
        handle,
        task,
        store,
        events,
    }
}

impl TestSession {
    pub async fn act(&self, action: Action) {
        self.handle
            .dispatch(action)
            .await
            .unwrap_or_else(|e| panic!("action failed: {e}"));
    }

    pub async fn open(&self, filename: &str) {
        self.act(Action::OpenVideo {
            filename: filename.into(),
        })
        .await;
    }

    /// Turn the open document into a complete one-step tutorial.
    pub async fn complete(&self, title: &str, description: &str) {
        self.act(Action::SetTitle(title.into())).await;
        self.act(Action::AddStep).await;
        self.act(Action::SetDescription {
            index: 0,
            text: description.into(),
        })
        .await;
    }

    /// Wait for the next event matching `pred`.
    pub async fn wait_for(
        &mut self,
        mut pred: impl FnMut(&SessionEventKind) -> bool,
    ) -> SessionEventKind {
        let events = &mut self.events;
        let next = async {
            loop {
                match events.recv().await {
                    Ok(event) if pred(&event.kind) => return event.kind,
                    Ok(_) => continue,
                    Err(e) => panic!("event stream failed: {e}"),
                }
            }
        };
        tokio::time::timeout(Duration::from_secs(600), next)
            .await
            .expect("timed out waiting for session event")
    }

    pub async fn wait_saved(&mut self) {
        self.wait_for(|kind| matches!(kind, SessionEventKind::Saved { .. }))
            .await;
    }
}

pub fn tutorial(title: &str, steps: &[(&str, &str)]) -> AnnotationDocument {
    let mut doc = AnnotationDocument::tutorial(title);
    doc.steps = steps
        .iter()
        .enumerate()
        .map(|(i, (timestamp, description))| Step {
            number: i + 1,
            timestamp: (*timestamp).into(),
            description: (*description).into(),
        })
        .collect();
    doc
}
