//! Editing session for one operator working through a set of videos.
//!
//! A session is a single task that owns the open annotation, applies
//! [`Action`]s from any number of [`SessionHandle`]s and autosaves the
//! document once edits go quiet for the configured delay. Status changes
//! are published on an [`EventBus`](mp4label_events::EventBus).
//!
//! ```no_run
//! # async fn demo() -> Result<(), mp4label_session::SessionError> {
//! use std::sync::Arc;
//! use mp4label_session::{Action, SessionConfig, SessionHandle};
//! use mp4label_sync::{MemoryAnnotationStore, SyncClient};
//!
//! let client = SyncClient::new(Arc::new(MemoryAnnotationStore::new()));
//! let (session, task) = SessionHandle::spawn(&SessionConfig::default(), client);
//!
//! session.dispatch(Action::OpenVideo { filename: "lesson.mp4".into() }).await?;
//! session.dispatch(Action::SetTitle("Changing a tyre".into())).await?;
//!
//! session.shutdown();
//! let _ = task.await;
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod config;
pub mod error;
pub mod handle;
pub mod scheduler;
mod session;
pub mod timer;

pub use action::{Action, SessionSnapshot};
pub use config::SessionConfig;
pub use error::SessionError;
pub use handle::SessionHandle;
