//! Readiness checks run before an annotation is persisted.
//!
//! [`validate`] reports the first violation with an operator-facing message
//! and is used for explicit saves. [`is_valid`] is the silent form used to
//! gate autosave while the operator is still typing.

use std::sync::LazyLock;

use regex::Regex;

use crate::annotation::AnnotationDocument;
use crate::error::CoreError;

/// Timestamps accepted for persisting: `mm:ss` or `mm:ss.SSS`.
pub const TIMESTAMP_PATTERN: &str = r"^\d{2}:\d{2}(\.\d{3})?$";

static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TIMESTAMP_PATTERN).expect("valid regex"));

/// Whether `timestamp` has the strict stored shape.
pub fn is_valid_timestamp(timestamp: &str) -> bool {
    TIMESTAMP_RE.is_match(timestamp)
}

/// Check that `doc` can be persisted, returning the first violation.
///
/// Non-tutorial documents are always valid. A tutorial needs a non-blank
/// title, at least one step, and every step needs a well-formed timestamp
/// and a non-blank description.
pub fn validate(doc: &AnnotationDocument) -> Result<(), CoreError> {
    if !doc.is_tutorial {
        return Ok(());
    }

    if doc.title.trim().is_empty() {
        return Err(CoreError::validation("Please enter tutorial title"));
    }

    if doc.steps.is_empty() {
        return Err(CoreError::validation("At least one step is required"));
    }

    for (index, step) in doc.steps.iter().enumerate() {
        let number = index + 1;
        if !is_valid_timestamp(&step.timestamp) {
            return Err(CoreError::step_validation(
                number,
                format!(
                    "Step {number} has invalid timestamp format. Should be mm:ss.SSS (e.g., 12:32.766)"
                ),
            ));
        }
        if step.description.trim().is_empty() {
            return Err(CoreError::step_validation(
                number,
                format!("Step {number} description cannot be empty"),
            ));
        }
    }

    Ok(())
}

/// Silent form of [`validate`].
pub fn is_valid(doc: &AnnotationDocument) -> bool {
    validate(doc).is_ok()
}
