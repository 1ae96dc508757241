//! Typed operator actions and the state the session reports back.

use mp4label_core::AnnotationDocument;
use mp4label_events::AutosaveState;

/// One operator intent. Step indices are 0-based positions in the list.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Switch to `filename`, flushing pending edits of the current video.
    OpenVideo { filename: String },
    SetTitle(String),
    SetTutorial(bool),
    /// Append an empty step at `00:00.000`.
    AddStep,
    /// Insert a step stamped with the playback position below the selection.
    InsertAtTime { seconds: f64 },
    Select { index: usize },
    SetDescription { index: usize, text: String },
    SetTimestamp { index: usize, text: String },
    RemoveStep { index: usize },
    /// Drag-and-drop reorder.
    MoveStep { from: usize, to: usize },
    /// Explicit save: strict validation, then an immediate write.
    Save,
    /// Run any pending autosave now and wait for it.
    Flush,
    /// Remove the saved annotation and reload.
    Delete,
}

impl Action {
    /// Whether the action changes the document and should schedule an
    /// autosave.
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            Self::SetTitle(_)
                | Self::SetTutorial(_)
                | Self::AddStep
                | Self::InsertAtTime { .. }
                | Self::SetDescription { .. }
                | Self::SetTimestamp { .. }
                | Self::RemoveStep { .. }
                | Self::MoveStep { .. }
        )
    }
}

/// Read-only view of the session after an action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub filename: Option<String>,
    pub stem: Option<String>,
    pub document: Option<AnnotationDocument>,
    pub selection: Option<usize>,
    pub state: AutosaveState,
    /// Model-generated reference annotation, when loaded.
    pub reference: Option<AnnotationDocument>,
}
