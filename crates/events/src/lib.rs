//! Session event types and the in-process bus that carries them.
//!
//! The editing session publishes a [`SessionEvent`] for every status
//! change so a front-end can render the autosave indicator without
//! reaching into session state.

pub mod bus;
pub mod status;

pub use bus::{EventBus, SessionEvent, SessionEventKind};
pub use status::AutosaveState;
