//! Storage abstraction for annotations keyed by video stem.

use async_trait::async_trait;
use mp4label_core::AnnotationDocument;

use crate::error::SyncError;

/// A remote (or in-process) home for annotations.
///
/// Implementations only move documents; deciding when to write and what
/// to do with failures belongs to [`SyncClient`](crate::SyncClient) and
/// the autosave scheduler.
#[async_trait]
pub trait AnnotationStore: Send + Sync {
    /// Fetch the annotation for `stem`.
    ///
    /// A store that maintains pre-annotations may return one here when no
    /// operator-saved annotation exists. `Ok(None)` means nothing at all.
    async fn fetch(&self, stem: &str) -> Result<Option<AnnotationDocument>, SyncError>;

    /// Create or replace the annotation for `stem`.
    async fn upsert(&self, stem: &str, doc: &AnnotationDocument) -> Result<(), SyncError>;

    /// Remove the saved annotation for `stem`.
    async fn remove(&self, stem: &str) -> Result<(), SyncError>;

    /// Fetch the read-only model-generated annotation for `stem`, if any.
    async fn fetch_model(&self, stem: &str) -> Result<Option<AnnotationDocument>, SyncError>;
}
