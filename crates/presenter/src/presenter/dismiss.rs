//! Dismissal and auto-dismiss timers

use std::time::Duration;

use crate::host::Completion;
use crate::timer::DismissTicket;

use super::{Presenter, SlotState};

impl Presenter {
    /// Dismiss the active message.
    ///
    /// The surface runs `on_complete` when its teardown finishes. With nothing
    /// displayed, `on_complete` runs immediately. The next stacked message is
    /// not shown automatically; call [`Presenter::present_next`] for that.
    pub fn dismiss(&mut self, on_complete: Option<Completion>) {
        match std::mem::replace(&mut self.state, SlotState::Free) {
            SlotState::Free => {
                tracing::debug!("dismiss with nothing displayed");
                if let Some(on_complete) = on_complete {
                    on_complete();
                }
            }
            SlotState::Occupied(session) => {
                if let Some(ticket) = session.timer {
                    self.scheduler.cancel(ticket);
                }
                tracing::info!(message_id = %session.message.id(), "dismissing message");
                session.surface.dismiss(on_complete);
            }
        }
    }

    /// Arm the auto-dismiss timer for the active message.
    ///
    /// Any timer already pending for the session is cancelled first. Returns
    /// `false` when nothing is displayed or the scheduler refused the timer.
    pub fn schedule_auto_dismiss(&mut self, duration: Duration) -> bool {
        let duration = self.config.clamp_auto_dismiss(duration);
        let SlotState::Occupied(session) = &mut self.state else {
            tracing::debug!("no active message to auto-dismiss");
            return false;
        };

        if let Some(previous) = session.timer.take() {
            self.scheduler.cancel(previous);
        }

        let ticket = self.next_ticket;
        self.next_ticket = ticket.next();

        match self.scheduler.schedule(duration, ticket) {
            Ok(()) => {
                session.timer = Some(ticket);
                true
            }
            Err(e) => {
                // Message stays up until dismissed by hand
                tracing::error!(message_id = %session.message.id(), error = %e, "failed to schedule auto-dismiss");
                false
            }
        }
    }

    /// Called by the scheduler when a dismiss timer fires.
    ///
    /// Only the active session's current ticket dismisses; anything else is
    /// stale and ignored. Returns whether a dismissal happened.
    pub fn handle_dismiss_timer(&mut self, ticket: DismissTicket) -> bool {
        match &mut self.state {
            SlotState::Occupied(session) if session.timer == Some(ticket) => {
                session.timer = None;
            }
            _ => {
                tracing::debug!(%ticket, "ignoring stale dismiss timer");
                return false;
            }
        }

        tracing::debug!(%ticket, "auto-dismiss fired");
        self.dismiss(None);
        true
    }
}
