//! Runs a script on a calloop event loop

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::time::{Duration, Instant};

use calloop::EventLoop;
use presenter::backend::headless::{HeadlessBackend, SurfaceEvent};
use presenter::timer::CalloopScheduler;
use presenter::{
    DisplayChoice, Message, MessageId, MessageSource, PresentOutcome, PresentationDelegate, Presenter,
    SourceContext,
};
use serde::Serialize;

use crate::script::{Script, ScriptError, Step};

/// Delegate answering with each message's scripted choice
#[derive(Default)]
struct ScriptDelegate {
    choices: RefCell<HashMap<MessageId, DisplayChoice>>,
}

impl PresentationDelegate for ScriptDelegate {
    fn display_choice(&self, message: &Message) -> DisplayChoice {
        self.choices
            .borrow()
            .get(&message.id())
            .copied()
            .unwrap_or_default()
    }
}

/// Data handed to loop callbacks
struct RunState {
    presenter: Presenter,
}

fn presenter_of(state: &mut RunState) -> &mut Presenter {
    &mut state.presenter
}

/// Result of a script run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Outcome counts keyed by outcome name
    pub outcomes: BTreeMap<String, usize>,

    /// Labels in the order they were put on screen
    pub shown: Vec<String>,

    /// Surfaces dismissed, by hand or by timer
    pub dismissed: usize,

    /// Label still on screen at the end
    pub active: Option<String>,

    /// Labels left on the pending stack, oldest first
    pub pending: Vec<String>,
}

/// Headless presenter plus the bookkeeping a script needs
pub struct Runner {
    event_loop: EventLoop<'static, RunState>,
    state: RunState,
    backend: HeadlessBackend,
    delegate: Rc<ScriptDelegate>,
    sources: HashMap<String, Rc<MessageSource>>,
    labels: HashMap<MessageId, String>,
    outcomes: BTreeMap<String, usize>,
}

impl Runner {
    pub fn new(script: &Script) -> Result<Self, ScriptError> {
        let event_loop: EventLoop<'static, RunState> = EventLoop::try_new()?;
        let backend = HeadlessBackend::new();
        let scheduler = CalloopScheduler::new(event_loop.handle(), presenter_of);
        let delegate = Rc::new(ScriptDelegate::default());

        let mut presenter = Presenter::new(script.config(), backend.collaborators(), Box::new(scheduler));
        presenter.set_delegate(&delegate);

        Ok(Self {
            event_loop,
            state: RunState { presenter },
            backend,
            delegate,
            sources: HashMap::new(),
            labels: HashMap::new(),
            outcomes: BTreeMap::new(),
        })
    }

    pub fn presenter(&self) -> &Presenter {
        &self.state.presenter
    }

    pub fn backend(&self) -> &HeadlessBackend {
        &self.backend
    }

    /// Run every step, then summarize.
    pub fn run(mut self, script: &Script) -> Result<RunSummary, ScriptError> {
        for (index, step) in script.steps.iter().enumerate() {
            let _span = tracing::debug_span!("step", index).entered();
            self.step(index, step)?;
        }
        Ok(self.summary())
    }

    fn step(&mut self, index: usize, step: &Step) -> Result<(), ScriptError> {
        match step {
            Step::Present(spec) => {
                let source = MessageSource::new();
                let message = spec.to_message().with_source(&source);
                self.delegate.choices.borrow_mut().insert(message.id(), spec.choice);
                self.labels.insert(message.id(), spec.label.clone());
                self.sources.insert(spec.label.clone(), source);

                let outcome = self.state.presenter.present(message);
                tracing::info!(label = %spec.label, ?outcome, "present");
                self.record(&outcome);
            }
            Step::PresentNext => match self.state.presenter.present_next() {
                Some(outcome) => {
                    tracing::info!(?outcome, "present_next");
                    self.record(&outcome);
                }
                None => tracing::info!("present_next: stack empty"),
            },
            Step::Dismiss => self.state.presenter.dismiss(None),
            Step::WaitMs(ms) => self.wait(Duration::from_millis(*ms))?,
            Step::Invalidate(label) => self.source(index, label)?.set_valid(false),
            Step::Discard(label) => self.source(index, label)?.discard(),
            Step::SetHostPresentable(presentable) => self.backend.host.set_presentable(*presentable),
            Step::ClearPending => {
                self.state.presenter.clear_pending();
            }
        }
        Ok(())
    }

    fn source(&self, step: usize, label: &str) -> Result<&Rc<MessageSource>, ScriptError> {
        self.sources.get(label).ok_or_else(|| ScriptError::UnknownLabel {
            step,
            label: label.to_string(),
        })
    }

    /// Dispatch the loop until `duration` has passed.
    fn wait(&mut self, duration: Duration) -> Result<(), ScriptError> {
        let deadline = Instant::now() + duration;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            self.event_loop.dispatch(Some(deadline - now), &mut self.state)?;
        }
    }

    fn record(&mut self, outcome: &PresentOutcome) {
        let name = match outcome {
            PresentOutcome::Presented => "presented",
            PresentOutcome::Stacked => "stacked",
            PresentOutcome::Deferred => "deferred",
            PresentOutcome::Discarded => "discarded",
            PresentOutcome::Rejected(_) => "rejected",
        };
        *self.outcomes.entry(name.to_string()).or_default() += 1;
    }

    fn label(&self, id: MessageId) -> String {
        self.labels.get(&id).cloned().unwrap_or_else(|| id.to_string())
    }

    fn summary(&self) -> RunSummary {
        let presenter = &self.state.presenter;
        RunSummary {
            outcomes: self.outcomes.clone(),
            shown: self.backend.log.built().into_iter().map(|id| self.label(id)).collect(),
            dismissed: self
                .backend
                .log
                .count(|e| matches!(e, SurfaceEvent::Dismissed { .. })),
            active: presenter.active_message().map(|m| self.label(m.id())),
            pending: presenter.pending_stack().iter().map(|m| self.label(m.id())).collect(),
        }
    }
}
