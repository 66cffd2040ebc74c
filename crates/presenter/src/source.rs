//! Upstream source contexts
//!
//! The component that produced a message owns its [`SourceContext`]. The
//! presenter holds only a weak reference through the message, reads the
//! validity flags, and reports discards and errors back.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::PresentError;

/// Validity and error-reporting handle owned by the message source
pub trait SourceContext {
    /// Whether upstream state still allows this message to be shown.
    fn is_valid(&self) -> bool;

    /// Whether the message was discarded. Once true, stays true.
    fn is_discarded(&self) -> bool;

    /// Mark the message discarded.
    fn discard(&self);

    /// Report an error scoped to this message.
    fn log_error(&self, error: &PresentError);
}

/// Basic source context with settable validity
///
/// INVARIANT: `discarded` never goes from true back to false.
#[derive(Debug)]
pub struct MessageSource {
    valid: Cell<bool>,
    discarded: Cell<bool>,
    errors: RefCell<Vec<PresentError>>,
}

impl MessageSource {
    /// Create a valid, not-yet-discarded source.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            valid: Cell::new(true),
            discarded: Cell::new(false),
            errors: RefCell::new(Vec::new()),
        })
    }

    /// Update validity from upstream state.
    pub fn set_valid(&self, valid: bool) {
        self.valid.set(valid);
    }

    /// Errors reported so far, oldest first.
    pub fn errors(&self) -> Vec<PresentError> {
        self.errors.borrow().clone()
    }
}

impl SourceContext for MessageSource {
    fn is_valid(&self) -> bool {
        self.valid.get()
    }

    fn is_discarded(&self) -> bool {
        self.discarded.get()
    }

    fn discard(&self) {
        if !self.discarded.replace(true) {
            tracing::debug!("message source discarded");
        }
    }

    fn log_error(&self, error: &PresentError) {
        tracing::warn!(error = %error, "message presentation failed");
        self.errors.borrow_mut().push(error.clone());
    }
}
