//! Auto-dismiss timers
//!
//! Timers fire on the same single-threaded loop as every other presenter
//! entry point. A fired timer re-enters the presenter through
//! [`Presenter::handle_dismiss_timer`], which ignores tickets that are no
//! longer current.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use calloop::timer::{TimeoutAction, Timer};
use calloop::{LoopHandle, RegistrationToken};
use thiserror::Error;

use crate::presenter::Presenter;

/// Timer scheduling errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The event loop refused the timer source
    #[error("failed to register dismiss timer: {0}")]
    Insert(#[source] calloop::Error),

    /// The scheduler is not attached to a running loop
    #[error("dismiss scheduler is detached")]
    Detached,
}

/// Identifies one scheduled auto-dismiss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DismissTicket(u64);

impl DismissTicket {
    pub fn first() -> Self {
        Self(1)
    }

    /// The ticket issued after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for DismissTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dismiss-{}", self.0)
    }
}

/// One-shot, cancelable dismiss timers
pub trait DismissScheduler {
    /// Fire `ticket` back at the presenter after `after`.
    fn schedule(&mut self, after: Duration, ticket: DismissTicket) -> Result<(), SchedulerError>;

    /// Cancel a ticket that has not fired. Unknown tickets are ignored.
    fn cancel(&mut self, ticket: DismissTicket);
}

/// Schedules dismiss timers as calloop timer sources
///
/// `presenter` resolves the presenter from the loop's shared data when a
/// timer fires.
pub struct CalloopScheduler<D: 'static> {
    handle: LoopHandle<'static, D>,
    presenter: fn(&mut D) -> &mut Presenter,
    registrations: Rc<RefCell<HashMap<DismissTicket, RegistrationToken>>>,
}

impl<D: 'static> CalloopScheduler<D> {
    pub fn new(handle: LoopHandle<'static, D>, presenter: fn(&mut D) -> &mut Presenter) -> Self {
        Self {
            handle,
            presenter,
            registrations: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Number of timers registered and not yet fired or cancelled.
    pub fn pending(&self) -> usize {
        self.registrations.borrow().len()
    }
}

impl<D: 'static> DismissScheduler for CalloopScheduler<D> {
    fn schedule(&mut self, after: Duration, ticket: DismissTicket) -> Result<(), SchedulerError> {
        let presenter = self.presenter;
        let registrations = Rc::clone(&self.registrations);

        let token = self
            .handle
            .insert_source(Timer::from_duration(after), move |_deadline, _: &mut (), data: &mut D| {
                registrations.borrow_mut().remove(&ticket);
                presenter(data).handle_dismiss_timer(ticket);
                TimeoutAction::Drop
            })
            .map_err(|e| SchedulerError::Insert(e.error))?;

        tracing::debug!(%ticket, ?after, "dismiss timer scheduled");
        self.registrations.borrow_mut().insert(ticket, token);
        Ok(())
    }

    fn cancel(&mut self, ticket: DismissTicket) {
        let token = self.registrations.borrow_mut().remove(&ticket);
        if let Some(token) = token {
            self.handle.remove(token);
            tracing::debug!(%ticket, "dismiss timer cancelled");
        }
    }
}
