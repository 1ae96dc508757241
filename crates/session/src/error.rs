use mp4label_core::CoreError;
use mp4label_sync::SyncError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Please select a video first")]
    NoVideoSelected,

    /// Rejected edit or failed validation on an explicit save.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The store did not complete a save or delete.
    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("Editing session has shut down")]
    Closed,
}
