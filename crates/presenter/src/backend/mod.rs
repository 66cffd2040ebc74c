//! Collaborator backends
//!
//! Real hosts implement the traits in [`crate::host`] against their own
//! windowing toolkit. This crate ships one backend:
//!
//! - **headless** (feature: `headless-backend`): in-process host, views and
//!   surfaces that record what would have been shown. Used by the test
//!   harness and the `msgstack` script runner.

#[cfg(feature = "headless-backend")]
pub mod headless;
