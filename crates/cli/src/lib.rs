//! `mp4label` library crate.
//!
//! Line-oriented front-end for the editing session. The binary entrypoint
//! lives in `main.rs`; the modules are public so the REPL can be driven
//! from integration tests.

pub mod command;
pub mod repl;
