//! Lenient load / save / delete facade over an [`AnnotationStore`].

use std::sync::Arc;

use mp4label_core::AnnotationDocument;

use crate::error::SyncError;
use crate::store::AnnotationStore;

/// Sync client used by the editing session.
///
/// `load` never fails: absence and transport errors both produce the
/// default empty tutorial, since a first-time annotation is the normal
/// case. `save` and `delete` report failures so the caller can surface
/// them as status.
#[derive(Clone)]
pub struct SyncClient {
    store: Arc<dyn AnnotationStore>,
}

impl SyncClient {
    pub fn new(store: Arc<dyn AnnotationStore>) -> Self {
        Self { store }
    }

    /// Load the annotation for `stem`, falling back to an empty tutorial.
    pub async fn load(&self, stem: &str) -> AnnotationDocument {
        match self.store.fetch(stem).await {
            Ok(Some(doc)) => {
                tracing::debug!(stem, steps = doc.steps.len(), "Loaded annotation");
                doc
            }
            Ok(None) => {
                tracing::debug!(stem, "No saved annotation, starting empty");
                AnnotationDocument::default()
            }
            Err(e) => {
                tracing::warn!(stem, error = %e, "Failed to load annotation, starting empty");
                AnnotationDocument::default()
            }
        }
    }

    /// Upsert the persisted form of `doc` under `stem`.
    pub async fn save(&self, stem: &str, doc: &AnnotationDocument) -> Result<(), SyncError> {
        self.store.upsert(stem, &doc.persisted()).await.map_err(|e| {
            tracing::warn!(stem, error = %e, "Failed to save annotation");
            e
        })
    }

    /// Remove the saved annotation for `stem`.
    pub async fn delete(&self, stem: &str) -> Result<(), SyncError> {
        self.store.remove(stem).await.map_err(|e| {
            tracing::warn!(stem, error = %e, "Failed to delete annotation");
            e
        })
    }

    /// Load the model-generated reference annotation; failures yield `None`.
    pub async fn load_model(&self, stem: &str) -> Option<AnnotationDocument> {
        match self.store.fetch_model(stem).await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(stem, error = %e, "Failed to load model annotation");
                None
            }
        }
    }
}

impl std::fmt::Debug for SyncClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncClient").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryAnnotationStore;
    use async_trait::async_trait;

    struct FailingStore;

    #[async_trait]
    impl AnnotationStore for FailingStore {
        async fn fetch(&self, _: &str) -> Result<Option<AnnotationDocument>, SyncError> {
            Err(SyncError::Unavailable("down".into()))
        }
        async fn upsert(&self, _: &str, _: &AnnotationDocument) -> Result<(), SyncError> {
            Err(SyncError::Unavailable("down".into()))
        }
        async fn remove(&self, _: &str) -> Result<(), SyncError> {
            Err(SyncError::Unavailable("down".into()))
        }
        async fn fetch_model(&self, _: &str) -> Result<Option<AnnotationDocument>, SyncError> {
            Err(SyncError::Unavailable("down".into()))
        }
    }

    #[tokio::test]
    async fn load_falls_back_to_empty_tutorial() {
        let client = SyncClient::new(Arc::new(FailingStore));
        assert_eq!(client.load("x").await, AnnotationDocument::default());
        assert!(client.load_model("x").await.is_none());

        let client = SyncClient::new(Arc::new(MemoryAnnotationStore::new()));
        assert_eq!(client.load("x").await, AnnotationDocument::default());
    }

    #[tokio::test]
    async fn save_and_delete_report_failures() {
        let client = SyncClient::new(Arc::new(FailingStore));
        assert!(client.save("x", &AnnotationDocument::default()).await.is_err());
        assert!(client.delete("x").await.is_err());
    }

    #[tokio::test]
    async fn save_uploads_persisted_form() {
        let store = Arc::new(MemoryAnnotationStore::new());
        let client = SyncClient::new(store.clone());

        let mut doc = AnnotationDocument::not_tutorial();
        doc.title = "leftover".into();
        client.save("x", &doc).await.unwrap();

        assert_eq!(store.saved("x").await, Some(AnnotationDocument::not_tutorial()));
    }
}
