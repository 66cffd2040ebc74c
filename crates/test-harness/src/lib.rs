//! Test harness for the presenter
//!
//! Provides infrastructure for exercising the presenter without a real host.
//!
//! # Modules
//!
//! - `headless`: presenter wrapper with a manual clock and scripted delegate
//! - `live`: presenter running on a real calloop event loop
//! - `assertions`: common invariant checks
//! - `fixtures`: message and presenter fixtures

pub mod assertions;
pub mod fixtures;
pub mod headless;
pub mod live;

pub use headless::{ManualClock, PresenterSnapshot, ScriptedDelegate, TestPresenter};
