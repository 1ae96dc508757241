//! Autosave state machine.
//!
//! [`AutosaveScheduler`] decides *whether* and *what* to write; the
//! session performs the write and reports back through
//! [`finish`](AutosaveScheduler::finish). Keeping I/O out of this type
//! lets every transition be driven synchronously.
//!
//! ```text
//! Idle ──edit──► Unsaved ──timer/flush──► Saving ──ok──► Saved
//!                  ▲  │                      └───err──► Error
//!                  │  └─invalid: stay Unsaved
//!     Saved/Error ─┘ edit
//! ```

use std::time::Duration;

use mp4label_core::{validation, AnnotationDocument, CoreError};
use mp4label_events::AutosaveState;

use crate::timer::DebounceTimer;

/// Outcome of preparing a save attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt {
    /// The document is incomplete; nothing is written.
    Invalid,
    /// The document matches the last persisted snapshot; nothing is written.
    Unchanged,
    /// Write `document`; on success `snapshot` becomes the new baseline.
    Write {
        snapshot: String,
        document: AnnotationDocument,
    },
}

#[derive(Debug)]
pub struct AutosaveScheduler {
    state: AutosaveState,
    /// Serialized form of the document at the last successful persist.
    baseline: String,
    timer: DebounceTimer,
}

impl AutosaveScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            state: AutosaveState::Idle,
            baseline: String::new(),
            timer: DebounceTimer::new(delay),
        }
    }

    pub fn state(&self) -> AutosaveState {
        self.state
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn timer_mut(&mut self) -> &mut DebounceTimer {
        &mut self.timer
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_armed()
    }

    /// A document was freshly loaded: back to `Idle` with its snapshot as
    /// the baseline.
    pub fn reset(&mut self, loaded: &AnnotationDocument) {
        self.timer.cancel();
        self.baseline = loaded.snapshot();
        self.state = AutosaveState::Idle;
    }

    /// The document changed: mark it unsaved and restart the countdown.
    pub fn note_edit(&mut self) {
        self.state = AutosaveState::Unsaved;
        self.timer.arm();
        tracing::debug!(delay_ms = self.timer.delay().as_millis() as u64, "Autosave armed");
    }

    /// Disarm the countdown. Returns whether it was armed.
    pub fn cancel(&mut self) -> bool {
        self.timer.cancel()
    }

    /// Prepare the attempt made when the timer fires or on flush.
    ///
    /// Invalid documents leave the state alone and are not retried until
    /// the next edit re-arms the timer. A document equal to the baseline
    /// goes straight to `Saved`.
    pub fn prepare(&mut self, doc: &AnnotationDocument) -> Attempt {
        if !validation::is_valid(doc) {
            tracing::debug!("Skipping autosave, annotation incomplete");
            return Attempt::Invalid;
        }

        let snapshot = doc.snapshot();
        if snapshot == self.baseline {
            tracing::debug!("Skipping autosave, annotation unchanged");
            self.state = AutosaveState::Saved;
            return Attempt::Unchanged;
        }

        self.state = AutosaveState::Saving;
        Attempt::Write {
            snapshot,
            document: doc.persisted(),
        }
    }

    /// Prepare an explicit save. The first validation failure is returned
    /// for display; a valid document is always written.
    pub fn prepare_manual(&mut self, doc: &AnnotationDocument) -> Result<Attempt, CoreError> {
        self.timer.cancel();
        validation::validate(doc)?;
        self.state = AutosaveState::Saving;
        Ok(Attempt::Write {
            snapshot: doc.snapshot(),
            document: doc.persisted(),
        })
    }

    /// A store operation other than a write failed; the next edit or
    /// explicit save starts over.
    pub fn fail(&mut self) {
        self.state = AutosaveState::Error;
    }

    /// Record the result of a write of `snapshot`.
    ///
    /// An edit made while the write was in flight keeps the state at
    /// `Unsaved`; the armed timer will pick it up.
    pub fn finish(&mut self, snapshot: String, succeeded: bool) {
        if succeeded {
            self.baseline = snapshot;
            if self.state == AutosaveState::Saving {
                self.state = AutosaveState::Saved;
            }
        } else {
            self.state = AutosaveState::Error;
        }
    }
}
