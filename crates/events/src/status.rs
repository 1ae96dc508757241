//! Autosave status as shown to the operator.

use serde::{Deserialize, Serialize};

/// Where the current document stands relative to the store.
///
/// `Idle` right after a load, `Unsaved` after any edit, `Saving` while a
/// write is in flight, then `Saved` or `Error`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutosaveState {
    #[default]
    Idle,
    Unsaved,
    Saving,
    Saved,
    Error,
}

impl AutosaveState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Unsaved => "unsaved",
            Self::Saving => "saving",
            Self::Saved => "saved",
            Self::Error => "error",
        }
    }

    /// Status indicator text. Empty while idle.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Unsaved => "● Unsaved",
            Self::Saving => "⏳ Saving...",
            Self::Saved => "✓ Saved",
            Self::Error => "✕ Save failed",
        }
    }
}

impl std::fmt::Display for AutosaveState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AutosaveState::Unsaved).unwrap(),
            "\"unsaved\""
        );
    }

    #[test]
    fn idle_has_no_label() {
        assert_eq!(AutosaveState::Idle.label(), "");
        assert_eq!(AutosaveState::Error.label(), "✕ Save failed");
    }
}
