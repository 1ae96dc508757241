//! The editing session actor.
//!
//! [`EditingSession`] owns everything that changes while the operator
//! works on one video: the step editor, the autosave scheduler and at
//! most one in-flight write. It runs as a single task fed by
//! [`SessionHandle`](crate::SessionHandle), so every operation sees a
//! consistent state without locks.
//!
//! Writes run on a spawned task so edits keep flowing while a save is in
//! flight. A debounce that expires during a write is deferred until the
//! write settles. Explicit saves, flushes, deletes and video switches
//! await the in-flight write instead, so writes for a stem never overlap.

use std::future;
use std::sync::Arc;

use mp4label_core::naming::stem_of;
use mp4label_core::{AnnotationDocument, CoreError, StepEditor};
use mp4label_events::{AutosaveState, EventBus, SessionEventKind};
use mp4label_sync::{SyncClient, SyncError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::action::{Action, SessionSnapshot};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::scheduler::{Attempt, AutosaveScheduler};

pub(crate) enum Request {
    Dispatch {
        action: Action,
        reply: oneshot::Sender<Result<SessionSnapshot, SessionError>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

/// The video currently open for editing.
struct ActiveVideo {
    filename: String,
    stem: String,
    editor: StepEditor,
    reference: Option<AnnotationDocument>,
}

/// A write that has been handed to the store but not yet acknowledged.
struct InFlightSave {
    /// Stem the write was issued for; results for any other stem are stale.
    stem: String,
    snapshot: String,
    handle: JoinHandle<Result<(), SyncError>>,
}

pub(crate) struct EditingSession {
    client: SyncClient,
    bus: Arc<EventBus>,
    media_extensions: Vec<String>,
    load_model_annotations: bool,
    active: Option<ActiveVideo>,
    scheduler: AutosaveScheduler,
    in_flight: Option<InFlightSave>,
    /// The debounce expired while a write was in flight.
    autosave_pending: bool,
    /// Last state announced on the bus.
    published: AutosaveState,
}

impl EditingSession {
    pub(crate) fn new(config: &SessionConfig, client: SyncClient, bus: Arc<EventBus>) -> Self {
        Self {
            client,
            bus,
            media_extensions: config.media_extensions.clone(),
            load_model_annotations: config.load_model_annotations,
            active: None,
            scheduler: AutosaveScheduler::new(config.autosave_delay),
            in_flight: None,
            autosave_pending: false,
            published: AutosaveState::Idle,
        }
    }

    /// Serve requests until every handle is dropped or `cancel` fires,
    /// then flush pending edits.
    pub(crate) async fn run(mut self, mut requests: mpsc::Receiver<Request>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                (save, result) = settle(&mut self.in_flight) => {
                    self.finish_save(save.stem, save.snapshot, &result);
                }
                () = self.scheduler.timer_mut().expired() => self.autosave(),
                request = requests.recv() => match request {
                    Some(request) => self.handle(request).await,
                    None => break,
                },
            }

            if self.autosave_pending && self.in_flight.is_none() {
                self.autosave();
            }
        }

        self.flush().await;
        tracing::info!("Editing session stopped");
    }

    async fn handle(&mut self, request: Request) {
        match request {
            Request::Dispatch { action, reply } => {
                let result = self.dispatch(action).await;
                let _ = reply.send(result);
            }
            Request::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    /// Apply one operator action and report the resulting state.
    pub(crate) async fn dispatch(&mut self, action: Action) -> Result<SessionSnapshot, SessionError> {
        tracing::debug!(?action, edit = action.is_edit(), "Dispatching action");
        let result = match action {
            Action::OpenVideo { filename } => {
                self.open_video(filename).await;
                Ok(())
            }
            Action::Save => self.save().await,
            Action::Flush => {
                self.flush().await;
                Ok(())
            }
            Action::Delete => self.delete().await,
            Action::Select { index } => self
                .editor_mut()
                .and_then(|editor| editor.select(index).map_err(SessionError::from)),
            Action::SetTitle(title) => self.edit(|editor| {
                editor.set_title(title);
                Ok(())
            }),
            Action::SetTutorial(is_tutorial) => self.edit(|editor| {
                editor.set_tutorial(is_tutorial);
                Ok(())
            }),
            Action::AddStep => self.edit(|editor| editor.add_step().map(drop)),
            Action::InsertAtTime { seconds } => {
                self.edit(|editor| editor.insert_at_time(seconds).map(drop))
            }
            Action::SetDescription { index, text } => {
                self.edit(|editor| editor.set_description(index, text))
            }
            Action::SetTimestamp { index, text } => {
                self.edit(|editor| editor.set_timestamp(index, text))
            }
            Action::RemoveStep { index } => self.edit(|editor| editor.remove(index).map(drop)),
            Action::MoveStep { from, to } => self.edit(|editor| editor.move_step(from, to)),
        };

        self.publish_state();
        result.map(|()| self.snapshot())
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        let state = self.scheduler.state();
        match &self.active {
            Some(active) => SessionSnapshot {
                filename: Some(active.filename.clone()),
                stem: Some(active.stem.clone()),
                document: Some(active.editor.document().clone()),
                selection: active.editor.selection(),
                state,
                reference: active.reference.clone(),
            },
            None => SessionSnapshot {
                state,
                ..SessionSnapshot::default()
            },
        }
    }

    // ---- editing ----

    fn editor_mut(&mut self) -> Result<&mut StepEditor, SessionError> {
        self.active
            .as_mut()
            .map(|active| &mut active.editor)
            .ok_or(SessionError::NoVideoSelected)
    }

    /// Run a document mutation and schedule an autosave if it succeeded.
    fn edit(
        &mut self,
        mutate: impl FnOnce(&mut StepEditor) -> Result<(), CoreError>,
    ) -> Result<(), SessionError> {
        mutate(self.editor_mut()?)?;
        self.scheduler.note_edit();
        Ok(())
    }

    // ---- loading ----

    async fn open_video(&mut self, filename: String) {
        if self.active.is_some() {
            self.flush().await;
        }
        let stem = stem_of(&filename, &self.media_extensions);
        self.load(filename, stem).await;
    }

    /// Replace the working document with the stored one for `stem`.
    async fn load(&mut self, filename: String, stem: String) {
        let document = self.client.load(&stem).await;
        let reference = if self.load_model_annotations {
            self.client.load_model(&stem).await
        } else {
            None
        };

        self.scheduler.reset(&document);
        self.autosave_pending = false;
        tracing::info!(stem = %stem, steps = document.steps.len(), "Video opened");
        self.bus.publish(SessionEventKind::DocumentLoaded { stem: stem.clone() });

        self.active = Some(ActiveVideo {
            filename,
            stem,
            editor: StepEditor::new(document),
            reference,
        });
        self.publish_state();
    }

    // ---- persisting ----

    /// Timer fired: silent validation, dedupe, then a background write.
    /// Never waits; with a write in flight the attempt is deferred.
    fn autosave(&mut self) {
        if self.in_flight.is_some() {
            tracing::debug!("Autosave deferred until the in-flight write settles");
            self.autosave_pending = true;
            return;
        }
        self.start_attempt(false);
    }

    /// Cancel the countdown and run the autosave attempt to completion.
    async fn flush(&mut self) {
        self.scheduler.cancel();
        self.settle_in_flight().await;
        self.start_attempt(true);
        self.settle_in_flight().await;
        self.publish_state();
    }

    fn start_attempt(&mut self, flushing: bool) {
        self.autosave_pending = false;
        let Some(active) = self.active.as_ref() else {
            return;
        };
        let was_unsaved = self.scheduler.state() == AutosaveState::Unsaved;

        match self.scheduler.prepare(active.editor.document()) {
            Attempt::Write { snapshot, document } => {
                let stem = active.stem.clone();
                self.start_write(stem, snapshot, document);
            }
            Attempt::Invalid if flushing && was_unsaved => {
                tracing::info!(stem = %active.stem, "Leaving incomplete annotation unsaved");
            }
            Attempt::Invalid | Attempt::Unchanged => {}
        }
        self.publish_state();
    }

    /// Explicit save: strict validation, then a write the caller waits on.
    async fn save(&mut self) -> Result<(), SessionError> {
        if self.active.is_none() {
            return Err(SessionError::NoVideoSelected);
        }
        self.scheduler.cancel();
        self.settle_in_flight().await;
        self.autosave_pending = false;

        let Some(active) = self.active.as_ref() else {
            return Err(SessionError::NoVideoSelected);
        };
        let Attempt::Write { snapshot, document } =
            self.scheduler.prepare_manual(active.editor.document())?
        else {
            return Ok(());
        };
        let stem = active.stem.clone();

        self.start_write(stem, snapshot, document);
        match self.settle_in_flight().await {
            Some(Err(e)) => Err(e.into()),
            _ => Ok(()),
        }
    }

    /// Remove the stored annotation and reload, which may surface a
    /// pre-annotation.
    async fn delete(&mut self) -> Result<(), SessionError> {
        let (filename, stem) = match &self.active {
            Some(active) => (active.filename.clone(), active.stem.clone()),
            None => return Err(SessionError::NoVideoSelected),
        };
        self.settle_in_flight().await;

        if let Err(e) = self.client.delete(&stem).await {
            self.scheduler.fail();
            self.bus.publish(SessionEventKind::DeleteFailed {
                stem,
                message: e.to_string(),
            });
            return Err(e.into());
        }
        tracing::info!(stem = %stem, "Annotation deleted");
        self.bus.publish(SessionEventKind::Deleted { stem: stem.clone() });

        self.load(filename, stem).await;
        Ok(())
    }

    fn start_write(&mut self, stem: String, snapshot: String, document: AnnotationDocument) {
        self.publish_state();

        let client = self.client.clone();
        let key = stem.clone();
        let handle = tokio::spawn(async move { client.save(&key, &document).await });
        self.in_flight = Some(InFlightSave {
            stem,
            snapshot,
            handle,
        });
    }

    /// Wait for the in-flight write, if any, and apply its result.
    async fn settle_in_flight(&mut self) -> Option<Result<(), SyncError>> {
        let InFlightSave {
            stem,
            snapshot,
            handle,
        } = self.in_flight.take()?;
        let result = flatten_join(handle.await);
        self.finish_save(stem, snapshot, &result);
        Some(result)
    }

    fn finish_save(&mut self, stem: String, snapshot: String, result: &Result<(), SyncError>) {
        let current = self.active.as_ref().map(|active| active.stem.as_str());
        if current != Some(stem.as_str()) {
            tracing::warn!(stem = %stem, "Discarding save result for a video that is no longer open");
            return;
        }

        match result {
            Ok(()) => {
                tracing::info!(stem = %stem, "Annotation saved");
                self.scheduler.finish(snapshot, true);
                self.bus.publish(SessionEventKind::Saved { stem });
            }
            Err(e) => {
                self.scheduler.finish(snapshot, false);
                self.bus.publish(SessionEventKind::SaveFailed {
                    stem,
                    message: e.to_string(),
                });
            }
        }
        self.publish_state();
    }

    fn publish_state(&mut self) {
        let state = self.scheduler.state();
        if state != self.published {
            tracing::debug!(state = %state, "Autosave status changed");
            self.published = state;
            self.bus.publish(SessionEventKind::StatusChanged { state });
        }
    }
}

/// Resolve when the in-flight write completes; pending while there is none.
async fn settle(slot: &mut Option<InFlightSave>) -> (InFlightSave, Result<(), SyncError>) {
    let Some(save) = slot.as_mut() else {
        return future::pending().await;
    };
    let joined = (&mut save.handle).await;
    let save = slot.take().expect("in-flight save is present until settled");
    (save, flatten_join(joined))
}

fn flatten_join(joined: Result<Result<(), SyncError>, JoinError>) -> Result<(), SyncError> {
    joined.unwrap_or_else(|e| Err(SyncError::Unavailable(format!("save task failed: {e}"))))
}
