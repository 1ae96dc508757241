/// Errors from talking to the annotation store.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store answered with a non-2xx status.
    #[error("Annotation store error ({status}): {body}")]
    Api {
        status: u16,
        /// Server-provided message.
        body: String,
    },

    /// The response body was not the expected JSON.
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured API base URL cannot carry annotation paths.
    #[error("Invalid annotation API URL: {0}")]
    InvalidUrl(String),

    #[error("No saved annotation for {0}")]
    NotFound(String),

    /// Failure injected or reported by a non-HTTP store.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
