//! Presenter on a real calloop event loop
//!
//! Dismiss timers here are real calloop timer sources, so these helpers are
//! for tests that need actual timer delivery rather than the manual clock.

use std::time::{Duration, Instant};

use calloop::EventLoop;
use presenter::backend::headless::HeadlessBackend;
use presenter::timer::CalloopScheduler;
use presenter::{Config, Presenter};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestError {
    #[error("timeout waiting for condition")]
    Timeout,

    #[error("event loop error: {0}")]
    EventLoop(#[from] calloop::Error),
}

/// Shared data handed to every loop callback
pub struct LoopState {
    pub presenter: Presenter,
}

fn presenter_of(state: &mut LoopState) -> &mut Presenter {
    &mut state.presenter
}

/// Presenter driven by a calloop event loop
pub struct LivePresenter {
    event_loop: EventLoop<'static, LoopState>,
    state: LoopState,
    backend: HeadlessBackend,
}

impl LivePresenter {
    pub fn new(config: Config) -> Result<Self, TestError> {
        let event_loop: EventLoop<'static, LoopState> = EventLoop::try_new()?;
        let backend = HeadlessBackend::new();
        let scheduler = CalloopScheduler::new(event_loop.handle(), presenter_of);
        let presenter = Presenter::new(config, backend.collaborators(), Box::new(scheduler));

        Ok(Self {
            event_loop,
            state: LoopState { presenter },
            backend,
        })
    }

    pub fn presenter(&self) -> &Presenter {
        &self.state.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut Presenter {
        &mut self.state.presenter
    }

    pub fn backend(&self) -> &HeadlessBackend {
        &self.backend
    }

    /// Dispatch once, waiting at most `timeout` for an event.
    pub fn dispatch(&mut self, timeout: Duration) -> Result<(), TestError> {
        self.event_loop.dispatch(Some(timeout), &mut self.state)?;
        Ok(())
    }

    /// Dispatch until `condition` holds or `timeout` elapses.
    pub fn run_until(
        &mut self,
        timeout: Duration,
        condition: impl Fn(&Presenter) -> bool,
    ) -> Result<(), TestError> {
        let deadline = Instant::now() + timeout;
        while !condition(&self.state.presenter) {
            let now = Instant::now();
            if now >= deadline {
                tracing::warn!(?timeout, "condition not met before timeout");
                return Err(TestError::Timeout);
            }
            self.dispatch((deadline - now).min(Duration::from_millis(10)))?;
        }
        Ok(())
    }
}
