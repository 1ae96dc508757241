//! Annotation document model and editing rules.
//!
//! Everything here is synchronous and free of I/O: the timestamp codec,
//! the document and its text layout, the step-list editor and the
//! validation gate used before persisting.

pub mod annotation;
pub mod editor;
pub mod error;
pub mod naming;
pub mod timestamp;
pub mod validation;

pub use annotation::{AnnotationDocument, Step};
pub use editor::StepEditor;
pub use error::CoreError;
