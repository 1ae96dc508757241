//! HTTP client for the annotation endpoints.
//!
//! Wraps `GET`/`POST`/`DELETE /api/annotation/{stem}.txt` and
//! `GET /api/model-annotation/{stem}.txt` using [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use mp4label_core::naming::annotation_file_name;
use mp4label_core::AnnotationDocument;
use reqwest::Url;
use serde::Deserialize;

use crate::error::SyncError;
use crate::store::AnnotationStore;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Response of the model-annotation endpoint.
#[derive(Debug, Deserialize)]
pub struct ModelAnnotationResponse {
    pub available: bool,
    #[serde(default)]
    pub annotation: Option<AnnotationDocument>,
}

/// [`AnnotationStore`] backed by the annotation HTTP API.
pub struct HttpAnnotationStore {
    client: reqwest::Client,
    base: Url,
}

impl HttpAnnotationStore {
    /// Create a store for the API rooted at `api_url`, e.g.
    /// `http://localhost:8080`.
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(client, api_url)
    }

    /// Create a store reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: &str) -> Result<Self, SyncError> {
        let base = Url::parse(api_url)
            .map_err(|e| SyncError::InvalidUrl(format!("{api_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(SyncError::InvalidUrl(api_url.to_string()));
        }
        Ok(Self { client, base })
    }

    pub fn api_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    fn annotation_url(&self, stem: &str) -> Url {
        self.endpoint("annotation", stem)
    }

    fn model_url(&self, stem: &str) -> Url {
        self.endpoint("model-annotation", stem)
    }

    /// `{base}/api/{route}/{stem}.txt`, with the file name percent-encoded
    /// as a single path segment.
    fn endpoint(&self, route: &str, stem: &str) -> Url {
        let file = annotation_file_name(stem);
        let mut url = self.base.clone();
        // Cannot fail: `with_client` rejects cannot-be-a-base URLs.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", route, file.as_str()]);
        }
        url
    }

    // ---- private helpers ----

    /// Turn a non-2xx response into [`SyncError::Api`] carrying the body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SyncError::Api {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }
        Ok(response)
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, SyncError> {
        let bytes = Self::ensure_success(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl AnnotationStore for HttpAnnotationStore {
    async fn fetch(&self, stem: &str) -> Result<Option<AnnotationDocument>, SyncError> {
        let response = self.client.get(self.annotation_url(stem)).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::parse_json(response).await.map(Some)
    }

    async fn upsert(&self, stem: &str, doc: &AnnotationDocument) -> Result<(), SyncError> {
        let response = self
            .client
            .post(self.annotation_url(stem))
            .json(doc)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn remove(&self, stem: &str) -> Result<(), SyncError> {
        let response = self.client.delete(self.annotation_url(stem)).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SyncError::NotFound(stem.to_string()));
        }
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn fetch_model(&self, stem: &str) -> Result<Option<AnnotationDocument>, SyncError> {
        let response = self.client.get(self.model_url(stem)).send().await?;
        let body: ModelAnnotationResponse = Self::parse_json(response).await?;
        Ok(body.annotation.filter(|_| body.available))
    }
}
