//! In-memory [`AnnotationStore`], for tests and offline sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mp4label_core::AnnotationDocument;
use tokio::sync::RwLock;

use crate::error::SyncError;
use crate::store::AnnotationStore;

/// Store that keeps annotations in process memory.
///
/// Pre-annotations registered with [`with_pre_annotation`](Self::with_pre_annotation)
/// are returned by `fetch` whenever no saved annotation exists, which
/// mirrors the fallback of the HTTP store after a delete.
#[derive(Debug, Default)]
pub struct MemoryAnnotationStore {
    saved: RwLock<HashMap<String, AnnotationDocument>>,
    pre_annotations: HashMap<String, AnnotationDocument>,
    models: HashMap<String, AnnotationDocument>,
    writes: AtomicUsize,
}

impl MemoryAnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pre_annotation(mut self, stem: impl Into<String>, doc: AnnotationDocument) -> Self {
        self.pre_annotations.insert(stem.into(), doc);
        self
    }

    pub fn with_model(mut self, stem: impl Into<String>, doc: AnnotationDocument) -> Self {
        self.models.insert(stem.into(), doc);
        self
    }

    /// Operator-saved annotation for `stem`, ignoring pre-annotations.
    pub async fn saved(&self, stem: &str) -> Option<AnnotationDocument> {
        self.saved.read().await.get(stem).cloned()
    }

    /// Number of successful `upsert` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnnotationStore for MemoryAnnotationStore {
    async fn fetch(&self, stem: &str) -> Result<Option<AnnotationDocument>, SyncError> {
        if let Some(doc) = self.saved.read().await.get(stem) {
            return Ok(Some(doc.clone()));
        }
        Ok(self.pre_annotations.get(stem).cloned())
    }

    async fn upsert(&self, stem: &str, doc: &AnnotationDocument) -> Result<(), SyncError> {
        self.saved
            .write()
            .await
            .insert(stem.to_string(), doc.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, stem: &str) -> Result<(), SyncError> {
        match self.saved.write().await.remove(stem) {
            Some(_) => Ok(()),
            None => Err(SyncError::NotFound(stem.to_string())),
        }
    }

    async fn fetch_model(&self, stem: &str) -> Result<Option<AnnotationDocument>, SyncError> {
        Ok(self.models.get(stem).cloned())
    }
}
