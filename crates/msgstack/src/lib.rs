//! Scripted driver for the message presenter
//!
//! A script is a JSON list of steps (present, dismiss, wait, ...) replayed
//! against a headless presenter on a calloop event loop, so dismiss timers
//! fire in real time.

pub mod runner;
pub mod script;

pub use runner::{RunSummary, Runner};
pub use script::{Script, ScriptError, Step};
