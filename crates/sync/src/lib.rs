//! Annotation persistence against a remote store.
//!
//! [`AnnotationStore`] is the seam between the editing session and the
//! place annotations live. [`HttpAnnotationStore`] talks to the annotation
//! HTTP API; [`MemoryAnnotationStore`] keeps everything in process.
//! [`SyncClient`] layers the lenient load policy on top.

pub mod client;
pub mod error;
pub mod http;
pub mod memory;
pub mod store;

pub use client::SyncClient;
pub use error::SyncError;
pub use http::HttpAnnotationStore;
pub use memory::MemoryAnnotationStore;
pub use store::AnnotationStore;
