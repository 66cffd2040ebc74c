//! Headless presenter wrapper for testing
//!
//! Wraps a real [`Presenter`] wired to the headless backend, a manual clock
//! standing in for the event loop's timers, and a scripted delegate.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::time::Duration;

use presenter::backend::headless::{HeadlessBackend, SurfaceEvent};
use presenter::delegate::{PresentationContext, WindowLevel};
use presenter::timer::{DismissScheduler, DismissTicket, SchedulerError};
use presenter::{Config, DisplayChoice, Message, MessageId, PresentOutcome, PresentationDelegate, Presenter};

#[derive(Debug, Default)]
struct ClockState {
    now: Duration,
    /// Pending timers by ticket, with their deadlines
    pending: BTreeMap<DismissTicket, Duration>,
    scheduled: usize,
    cancelled: usize,
    refuse_next: bool,
}

/// Manually advanced stand-in for event loop timers
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    state: Rc<RefCell<ClockState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Move time forward, returning tickets that came due, earliest first.
    pub fn advance(&self, by: Duration) -> Vec<DismissTicket> {
        let mut state = self.state.borrow_mut();
        state.now += by;
        let now = state.now;

        let mut due: Vec<(Duration, DismissTicket)> = state
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(ticket, deadline)| (*deadline, *ticket))
            .collect();
        due.sort();

        for (_, ticket) in &due {
            state.pending.remove(ticket);
        }
        due.into_iter().map(|(_, ticket)| ticket).collect()
    }

    /// Timers scheduled and not yet fired or cancelled.
    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    pub fn scheduled(&self) -> usize {
        self.state.borrow().scheduled
    }

    pub fn cancelled(&self) -> usize {
        self.state.borrow().cancelled
    }

    /// Make the next `schedule` call fail.
    pub fn refuse_next(&self) {
        self.state.borrow_mut().refuse_next = true;
    }
}

impl DismissScheduler for ManualClock {
    fn schedule(&mut self, after: Duration, ticket: DismissTicket) -> Result<(), SchedulerError> {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.refuse_next) {
            return Err(SchedulerError::Detached);
        }
        let deadline = state.now + after;
        state.pending.insert(ticket, deadline);
        state.scheduled += 1;
        Ok(())
    }

    fn cancel(&mut self, ticket: DismissTicket) {
        let mut state = self.state.borrow_mut();
        if state.pending.remove(&ticket).is_some() {
            state.cancelled += 1;
        }
    }
}

/// Delegate whose answers are set by the test
#[derive(Default)]
pub struct ScriptedDelegate {
    default_choice: Cell<DisplayChoice>,
    choices: RefCell<HashMap<MessageId, DisplayChoice>>,
    window_level: Cell<Option<WindowLevel>>,
    asked: RefCell<Vec<MessageId>>,
    prepared: RefCell<Vec<MessageId>>,
}

impl ScriptedDelegate {
    pub fn set_default_choice(&self, choice: DisplayChoice) {
        self.default_choice.set(choice);
    }

    /// Answer `choice` for one specific message.
    pub fn choose_for(&self, id: MessageId, choice: DisplayChoice) {
        self.choices.borrow_mut().insert(id, choice);
    }

    pub fn set_window_level(&self, level: Option<WindowLevel>) {
        self.window_level.set(level);
    }

    /// Messages the presenter asked about, in order.
    pub fn asked(&self) -> Vec<MessageId> {
        self.asked.borrow().clone()
    }

    /// Messages that reached `prepare`, in order.
    pub fn prepared(&self) -> Vec<MessageId> {
        self.prepared.borrow().clone()
    }
}

impl PresentationDelegate for ScriptedDelegate {
    fn display_choice(&self, message: &Message) -> DisplayChoice {
        self.asked.borrow_mut().push(message.id());
        self.choices
            .borrow()
            .get(&message.id())
            .copied()
            .unwrap_or(self.default_choice.get())
    }

    fn prepare(&self, message: &Message, context: &mut PresentationContext) {
        self.prepared.borrow_mut().push(message.id());
        if let Some(level) = self.window_level.get() {
            context.window_level = level;
        }
    }
}

/// Snapshot of presenter state for assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenterSnapshot {
    /// Message in the display slot
    pub active: Option<MessageId>,

    /// Pending stack, oldest first
    pub pending: Vec<MessageId>,

    /// Whether a dismiss timer is armed
    pub timer_armed: bool,

    /// Surfaces created and not yet dismissed
    pub live_surfaces: usize,

    /// Messages the view builder was asked to render, in order
    pub built: Vec<MessageId>,
}

/// Test presenter wrapper
pub struct TestPresenter {
    presenter: Presenter,
    backend: HeadlessBackend,
    clock: ManualClock,
    delegate: Rc<ScriptedDelegate>,
}

impl Default for TestPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPresenter {
    /// Presenter with a presentable host and default config.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Presenter in headless mode.
    pub fn new_headless() -> Self {
        Self::with_config(Config::headless())
    }

    pub fn with_config(config: Config) -> Self {
        let backend = HeadlessBackend::new();
        let clock = ManualClock::new();
        let delegate = Rc::new(ScriptedDelegate::default());

        let mut presenter = Presenter::new(config, backend.collaborators(), Box::new(clock.clone()));
        presenter.set_delegate(&delegate);

        Self {
            presenter,
            backend,
            clock,
            delegate,
        }
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut Presenter {
        &mut self.presenter
    }

    pub fn backend(&self) -> &HeadlessBackend {
        &self.backend
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn delegate(&self) -> &ScriptedDelegate {
        &self.delegate
    }

    /// Drop the harness's delegate; the presenter falls back to defaults.
    pub fn drop_delegate(&mut self) {
        self.delegate = Rc::new(ScriptedDelegate::default());
    }

    pub fn present(&mut self, message: Message) -> PresentOutcome {
        self.presenter.present(message)
    }

    pub fn present_next(&mut self) -> Option<PresentOutcome> {
        self.presenter.present_next()
    }

    /// Dismiss, returning whether the completion ran.
    pub fn dismiss(&mut self) -> bool {
        let done = Rc::new(Cell::new(false));
        let flag = Rc::clone(&done);
        self.presenter.dismiss(Some(Box::new(move || flag.set(true))));
        done.get()
    }

    /// Advance the clock and deliver due timers. Returns dismissals.
    pub fn advance(&mut self, by: Duration) -> usize {
        self.clock
            .advance(by)
            .into_iter()
            .filter(|ticket| self.presenter.handle_dismiss_timer(*ticket))
            .count()
    }

    /// Number of times a surface was dismissed.
    pub fn dismissals(&self) -> usize {
        self.backend
            .log
            .count(|e| matches!(e, SurfaceEvent::Dismissed { .. }))
    }

    pub fn snapshot(&self) -> PresenterSnapshot {
        let created = self.backend.log.count(|e| matches!(e, SurfaceEvent::Created { .. }));
        PresenterSnapshot {
            active: self.presenter.active_message().map(Message::id),
            pending: self.presenter.pending_stack().iter().map(Message::id).collect(),
            timer_armed: self.presenter.pending_dismiss().is_some(),
            live_surfaces: created - self.dismissals(),
            built: self.backend.log.built(),
        }
    }
}
