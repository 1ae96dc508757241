//! Structural editing of a document's step list.
//!
//! [`StepEditor`] owns the working [`AnnotationDocument`] together with the
//! selection cursor. Every structural operation leaves step numbers equal
//! to `1..=N` in list order.

use crate::annotation::{AnnotationDocument, Step, DEFAULT_STEP_TIMESTAMP};
use crate::error::CoreError;
use crate::timestamp;

/// Working state for the document being edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepEditor {
    document: AnnotationDocument,
    /// Index of the active step. Never persisted.
    selection: Option<usize>,
}

impl StepEditor {
    /// Start editing `document`; the first step is selected if there is one.
    pub fn new(mut document: AnnotationDocument) -> Self {
        document.renumber();
        let mut editor = Self {
            document,
            selection: None,
        };
        editor.refresh_selection();
        editor
    }

    pub fn document(&self) -> &AnnotationDocument {
        &self.document
    }

    pub fn into_document(self) -> AnnotationDocument {
        self.document
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn len(&self) -> usize {
        self.document.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.steps.is_empty()
    }

    // ---- field edits ----

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.document.title = title.into();
    }

    /// Switch between the tutorial and non-tutorial shapes. The document is
    /// replaced by an empty one of the requested shape.
    pub fn set_tutorial(&mut self, is_tutorial: bool) {
        self.document = if is_tutorial {
            AnnotationDocument::default()
        } else {
            AnnotationDocument::not_tutorial()
        };
        self.selection = None;
    }

    pub fn set_description(
        &mut self,
        index: usize,
        description: impl Into<String>,
    ) -> Result<(), CoreError> {
        self.step_mut(index)?.description = description.into();
        Ok(())
    }

    pub fn set_timestamp(
        &mut self,
        index: usize,
        timestamp: impl Into<String>,
    ) -> Result<(), CoreError> {
        self.step_mut(index)?.timestamp = timestamp.into();
        Ok(())
    }

    /// Make `index` the active step.
    pub fn select(&mut self, index: usize) -> Result<(), CoreError> {
        self.check_index(index)?;
        self.selection = Some(index);
        Ok(())
    }

    // ---- structural edits ----

    /// Push `step` to the end of the list and return its index.
    pub fn append(&mut self, step: Step) -> Result<usize, CoreError> {
        self.ensure_tutorial()?;
        self.document.steps.push(step);
        self.document.renumber();
        Ok(self.len() - 1)
    }

    /// Append an empty step at `00:00.000`.
    pub fn add_step(&mut self) -> Result<usize, CoreError> {
        self.append(Step::at(DEFAULT_STEP_TIMESTAMP))
    }

    /// Insert `step` directly below the selected step, or at the end when
    /// nothing is selected. The new step becomes the selection.
    pub fn insert_after_selection(&mut self, step: Step) -> Result<usize, CoreError> {
        self.ensure_tutorial()?;
        let index = match self.selection {
            Some(selected) if selected < self.len() => selected + 1,
            _ => self.len(),
        };
        self.document.steps.insert(index, step);
        self.document.renumber();
        self.selection = Some(index);
        Ok(index)
    }

    /// Insert an empty step stamped with the playback position `seconds`.
    pub fn insert_at_time(&mut self, seconds: f64) -> Result<usize, CoreError> {
        self.insert_after_selection(Step::at(timestamp::format(seconds)))
    }

    /// Remove the step at `index` and adjust the selection:
    ///
    /// - removing the selected step selects `min(index, len - 1)`, or
    ///   nothing when the list is now empty;
    /// - removing a step above the selection shifts it up by one.
    pub fn remove(&mut self, index: usize) -> Result<Step, CoreError> {
        self.check_index(index)?;
        let removed = self.document.steps.remove(index);
        self.document.renumber();

        self.selection = match self.selection {
            Some(selected) if selected == index => {
                (!self.is_empty()).then(|| index.min(self.len() - 1))
            }
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };
        self.refresh_selection();
        Ok(removed)
    }

    /// Move the step at `from` so that it ends up at `to`. `to` is an index
    /// into the list after `from` has been taken out.
    pub fn move_step(&mut self, from: usize, to: usize) -> Result<(), CoreError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(());
        }
        let step = self.document.steps.remove(from);
        self.document.steps.insert(to, step);
        self.document.renumber();
        self.refresh_selection();
        Ok(())
    }

    /// Keep the selection if it still points at a step, otherwise fall back
    /// to the first step, or to nothing for an empty list.
    pub fn refresh_selection(&mut self) {
        self.selection = match self.selection {
            Some(selected) if selected < self.len() => Some(selected),
            _ if !self.is_empty() => Some(0),
            _ => None,
        };
    }

    // ---- private helpers ----

    fn ensure_tutorial(&self) -> Result<(), CoreError> {
        if self.document.is_tutorial {
            Ok(())
        } else {
            Err(CoreError::NotTutorial)
        }
    }

    fn check_index(&self, index: usize) -> Result<(), CoreError> {
        if index < self.len() {
            Ok(())
        } else {
            Err(CoreError::StepOutOfRange {
                index,
                len: self.len(),
            })
        }
    }

    fn step_mut(&mut self, index: usize) -> Result<&mut Step, CoreError> {
        self.check_index(index)?;
        Ok(&mut self.document.steps[index])
    }
}
