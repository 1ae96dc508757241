//! Annotation document model and its `.txt` rendering.
//!
//! An [`AnnotationDocument`] is either a tutorial (title plus an ordered
//! list of [`Step`]s) or a non-tutorial marker. Step numbers are derived
//! from list position and re-derived by [`AnnotationDocument::renumber`]
//! after every structural change.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::timestamp;

/// Marker line written in place of a title for non-tutorial videos.
pub const NOT_TUTORIAL_MARKER: &str = "[not tutorial]";

/// Timestamp assigned to steps added without a playback position.
pub const DEFAULT_STEP_TIMESTAMP: &str = "00:00.000";

static STEP_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\)\s+(\d{2}:\d{2}(?:\.\d{3})?)\s+(.+)$").expect("valid regex")
});

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One timestamped step of a tutorial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// 1-based position in the step list.
    pub number: usize,
    /// `mm:ss.SSS` (or `mm:ss`) position in the video.
    pub timestamp: String,
    pub description: String,
}

impl Step {
    /// A step at `timestamp` with an empty description. The number is
    /// assigned when the step is placed in a document.
    pub fn at(timestamp: impl Into<String>) -> Self {
        Self {
            number: 0,
            timestamp: timestamp.into(),
            description: String::new(),
        }
    }
}

/// The annotation for a single video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    #[serde(default)]
    pub title: String,
    pub is_tutorial: bool,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Default for AnnotationDocument {
    /// An empty tutorial, used when nothing has been saved yet.
    fn default() -> Self {
        Self::tutorial("")
    }
}

impl AnnotationDocument {
    /// An empty tutorial with the given title.
    pub fn tutorial(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_tutorial: true,
            steps: Vec::new(),
        }
    }

    /// A document marking the video as not a tutorial.
    pub fn not_tutorial() -> Self {
        Self {
            title: String::new(),
            is_tutorial: false,
            steps: Vec::new(),
        }
    }

    /// Re-derive every step number from its list position.
    pub fn renumber(&mut self) {
        for (index, step) in self.steps.iter_mut().enumerate() {
            step.number = index + 1;
        }
    }

    /// The form that is uploaded and compared against the baseline: the
    /// title is trimmed, and non-tutorial documents carry no title or steps.
    pub fn persisted(&self) -> Self {
        if !self.is_tutorial {
            return Self::not_tutorial();
        }
        let mut doc = self.clone();
        doc.title = doc.title.trim().to_string();
        doc.renumber();
        doc
    }

    /// Serialized [`persisted`](Self::persisted) form.
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.persisted()).expect("AnnotationDocument is always serialisable")
    }
}

// ---------------------------------------------------------------------------
// Text format
// ---------------------------------------------------------------------------

/// Render a document in the `.txt` layout used by the annotation store.
///
/// ```text
/// Title
///
/// 1) 00:11.000 First step
/// 2) 00:42.120 Second step
/// ```
pub fn to_text(doc: &AnnotationDocument) -> String {
    if !doc.is_tutorial {
        return format!("{NOT_TUTORIAL_MARKER}\n");
    }

    let mut out = String::new();
    if !doc.title.is_empty() {
        out.push_str(&doc.title);
        out.push_str("\n\n");
    }
    for step in &doc.steps {
        out.push_str(&format!(
            "{}) {} {}\n",
            step.number, step.timestamp, step.description
        ));
    }
    out
}

/// Parse the `.txt` layout produced by [`to_text`].
///
/// Lines after the title that do not look like `N) mm:ss[.SSS] text` are
/// skipped. Steps are renumbered by position.
pub fn from_text(text: &str) -> AnnotationDocument {
    let mut lines = text.lines();
    let Some(first) = lines.next() else {
        return AnnotationDocument::default();
    };

    let first = first.trim();
    if first.eq_ignore_ascii_case(NOT_TUTORIAL_MARKER) {
        return AnnotationDocument::not_tutorial();
    }

    let mut doc = AnnotationDocument::tutorial(first);
    for line in lines.map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = STEP_LINE_RE.captures(line) {
            doc.steps.push(Step {
                number: 0,
                timestamp: timestamp::with_millis(&caps[2]),
                description: caps[3].to_string(),
            });
        }
    }
    doc.renumber();
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnnotationDocument {
        let mut doc = AnnotationDocument::tutorial("Replace a fuse");
        doc.steps.push(Step {
            number: 0,
            timestamp: "00:11.000".into(),
            description: "Open the panel".into(),
        });
        doc.steps.push(Step {
            number: 0,
            timestamp: "01:02.500".into(),
            description: "Pull the fuse".into(),
        });
        doc.renumber();
        doc
    }

    #[test]
    fn default_is_empty_tutorial() {
        let doc = AnnotationDocument::default();
        assert!(doc.is_tutorial);
        assert!(doc.title.is_empty());
        assert!(doc.steps.is_empty());
    }

    #[test]
    fn json_shape_matches_store_contract() {
        let json: serde_json::Value = serde_json::from_str(&sample().snapshot()).unwrap();
        assert_eq!(json["title"], "Replace a fuse");
        assert_eq!(json["is_tutorial"], true);
        assert_eq!(json["steps"][1]["number"], 2);
        assert_eq!(json["steps"][1]["timestamp"], "01:02.500");
        assert_eq!(json["steps"][1]["description"], "Pull the fuse");
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let doc: AnnotationDocument = serde_json::from_str(r#"{"is_tutorial": false}"#).unwrap();
        assert_eq!(doc, AnnotationDocument::not_tutorial());
    }

    #[test]
    fn persisted_trims_title() {
        let mut doc = sample();
        doc.title = "  Replace a fuse \n".into();
        assert_eq!(doc.persisted().title, "Replace a fuse");
    }

    #[test]
    fn persisted_non_tutorial_drops_content() {
        let mut doc = sample();
        doc.is_tutorial = false;
        assert_eq!(doc.persisted(), AnnotationDocument::not_tutorial());
    }

    #[test]
    fn snapshot_ignores_title_whitespace() {
        let mut padded = sample();
        padded.title.push(' ');
        assert_eq!(padded.snapshot(), sample().snapshot());
    }

    #[test]
    fn text_layout() {
        assert_eq!(
            to_text(&sample()),
            "Replace a fuse\n\n1) 00:11.000 Open the panel\n2) 01:02.500 Pull the fuse\n"
        );
        assert_eq!(to_text(&AnnotationDocument::not_tutorial()), "[not tutorial]\n");
    }

    #[test]
    fn text_round_trips() {
        assert_eq!(from_text(&to_text(&sample())), sample());
    }

    #[test]
    fn from_text_handles_marker_and_empty_input() {
        assert_eq!(from_text(""), AnnotationDocument::default());
        assert_eq!(from_text("  [NOT TUTORIAL]  \n"), AnnotationDocument::not_tutorial());
    }

    #[test]
    fn from_text_coerces_short_timestamps_and_skips_noise() {
        let doc = from_text("Title\n\n3) 00:11 First\nnot a step\n7) 00:12.250 Second\n");
        assert_eq!(doc.steps.len(), 2);
        assert_eq!(doc.steps[0].timestamp, "00:11.000");
        assert_eq!(doc.steps[0].number, 1);
        assert_eq!(doc.steps[1].number, 2);
        assert_eq!(doc.steps[1].description, "Second");
    }
}
