//! Presentation coordinator
//!
//! The [`Presenter`] owns the single display slot and the pending stack. For
//! each request it runs the guard pipeline, asks the delegate what to do, and
//! either shows the message, stacks it, or discards it.
//!
//! # State
//!
//! The slot is either free or occupied by one active session (message,
//! surface, optional dismiss timer).
//!
//! INVARIANT: the active message is never also in the pending stack, and a
//! free slot holds no surface.
//!
//! # Threading
//!
//! Single-threaded. Every entry point, including fired dismiss timers, runs
//! on the host UI thread; there are no locks. Delegate hooks are called
//! in-line and only see shared references, so they cannot re-enter the
//! presenter mid-transition.

mod dismiss;
mod present;

use std::rc::{Rc, Weak};
use std::thread::{self, ThreadId};

use crate::config::Config;
use crate::delegate::PresentationDelegate;
use crate::error::PresentError;
use crate::host::{
    Collaborators, DisplaySurface, Host, IconRegistrar, MediaProvider, MessageView, SurfaceFactory,
    ViewBuilder,
};
use crate::message::Message;
use crate::stack::PendingStack;
use crate::timer::{DismissScheduler, DismissTicket};

/// What a presentation request ended in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentOutcome {
    /// The message now owns the display slot
    Presented,
    /// Another message is displayed; this one was pushed onto the stack
    Stacked,
    /// The delegate chose to show it later; pushed onto the stack
    Deferred,
    /// The delegate chose to drop it; its source was discarded
    Discarded,
    /// A guard or the view builder stopped the attempt
    Rejected(PresentError),
}

impl PresentOutcome {
    pub fn is_presented(&self) -> bool {
        matches!(self, PresentOutcome::Presented)
    }
}

/// The message currently on screen
struct ActiveSession {
    message: Message,
    surface: Box<dyn DisplaySurface>,
    timer: Option<DismissTicket>,
}

enum SlotState {
    Free,
    Occupied(ActiveSession),
}

/// Coordinates in-app message presentation
pub struct Presenter {
    config: Config,

    /// Thread every entry point must run on
    ui_thread: ThreadId,

    host: Box<dyn Host>,
    views: Box<dyn ViewBuilder>,
    surfaces: Box<dyn SurfaceFactory>,
    icons: Box<dyn IconRegistrar>,
    media: Option<Rc<dyn MediaProvider>>,
    scheduler: Box<dyn DismissScheduler>,

    /// Non-owning; a dropped delegate falls back to defaults
    delegate: Option<Weak<dyn PresentationDelegate>>,

    stack: PendingStack,
    state: SlotState,
    next_ticket: DismissTicket,
}

impl Presenter {
    /// Create a presenter bound to the calling thread.
    pub fn new(config: Config, collaborators: Collaborators, scheduler: Box<dyn DismissScheduler>) -> Self {
        let Collaborators { host, views, surfaces, icons, media } = collaborators;
        tracing::debug!(headless = config.headless_mode, "presenter created");
        Self {
            config,
            ui_thread: thread::current().id(),
            host,
            views,
            surfaces,
            icons,
            media,
            scheduler,
            delegate: None,
            stack: PendingStack::new(),
            state: SlotState::Free,
            next_ticket: DismissTicket::first(),
        }
    }

    /// Bind the thread-affinity guard to a specific UI thread.
    #[must_use]
    pub fn with_ui_thread(mut self, ui_thread: ThreadId) -> Self {
        self.ui_thread = ui_thread;
        self
    }

    /// Register the delegate. Only a weak reference is kept.
    pub fn set_delegate<D: PresentationDelegate + 'static>(&mut self, delegate: &Rc<D>) {
        let delegate: Rc<dyn PresentationDelegate> = delegate.clone();
        self.delegate = Some(Rc::downgrade(&delegate));
    }

    pub fn clear_delegate(&mut self) {
        self.delegate = None;
    }

    /// The delegate, if one is registered and still alive.
    fn delegate(&self) -> Option<Rc<dyn PresentationDelegate>> {
        self.delegate.as_ref().and_then(Weak::upgrade)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_headless_mode(&mut self, headless: bool) {
        self.config.headless_mode = headless;
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self.state, SlotState::Occupied(_))
    }

    /// The message occupying the display slot.
    pub fn active_message(&self) -> Option<&Message> {
        match &self.state {
            SlotState::Occupied(session) => Some(&session.message),
            SlotState::Free => None,
        }
    }

    /// View of the message on screen, if any.
    pub fn current_message_view(&self) -> Option<Rc<dyn MessageView>> {
        match &self.state {
            SlotState::Occupied(session) => Some(session.surface.view()),
            SlotState::Free => None,
        }
    }

    /// Whether the active surface reports itself on screen.
    pub fn surface_active(&self) -> bool {
        match &self.state {
            SlotState::Occupied(session) => session.surface.is_active(),
            SlotState::Free => false,
        }
    }

    /// Ticket of the pending auto-dismiss for the active message.
    pub fn pending_dismiss(&self) -> Option<DismissTicket> {
        match &self.state {
            SlotState::Occupied(session) => session.timer,
            SlotState::Free => None,
        }
    }

    /// Deferred messages in insertion order (the last one is shown next).
    pub fn pending_stack(&self) -> &[Message] {
        self.stack.as_slice()
    }

    /// Discard every stacked message. Returns how many were dropped.
    pub fn clear_pending(&mut self) -> usize {
        let drained = self.stack.drain();
        for message in &drained {
            message.discard_source();
        }
        if !drained.is_empty() {
            tracing::info!(count = drained.len(), "cleared pending messages");
        }
        drained.len()
    }

    /// Report an error to the message's source, or the process log without one.
    fn report(&self, message: &Message, error: &PresentError) {
        let id = message.id();
        match error {
            PresentError::WrongThread | PresentError::NoRenderableView => {
                tracing::error!(message_id = %id, error = %error, "presentation failed");
            }
            PresentError::IconAssetUnavailable => {
                tracing::warn!(message_id = %id, error = %error, "presenting without icon font");
            }
            _ => {
                tracing::debug!(message_id = %id, error = %error, "presentation guard failed");
            }
        }

        match message.source() {
            Some(source) => source.log_error(error),
            None => tracing::info!(message_id = %id, error = %error, "no source context to report to"),
        }
    }
}
