//! In-app message presenter
//!
//! Shows app-triggered message overlays one at a time. Requests that cannot be
//! shown right now are stacked (last in, first out) or discarded, and a host
//! delegate gets to veto, defer, or restyle each presentation.
//!
//! The platform pieces (windows, views, orientation, icon fonts) are consumed
//! through the traits in [`host`]; [`backend::headless`] provides in-process
//! implementations for tests and scripted runs.

pub mod backend;
pub mod config;
pub mod delegate;
pub mod error;
pub mod guards;
pub mod host;
pub mod message;
pub mod presenter;
pub mod source;
pub mod stack;
pub mod timer;

pub use config::Config;
pub use delegate::{DisplayChoice, PresentationContext, PresentationDelegate};
pub use error::PresentError;
pub use message::{ClosePolicy, Message, MessageId, OrientationRequirement};
pub use presenter::{PresentOutcome, Presenter};
pub use source::{MessageSource, SourceContext};
pub use stack::PendingStack;
