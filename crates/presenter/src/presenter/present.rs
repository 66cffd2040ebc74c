//! Presentation entry points

use crate::delegate::{DisplayChoice, PresentationContext};
use crate::error::PresentError;
use crate::guards::{self, FailureEffect, GuardEnv, Rejection, Stage};
use crate::message::{ClosePolicy, Message, RenderAttributes};

use super::{ActiveSession, PresentOutcome, Presenter, SlotState};

impl Presenter {
    /// Handle a new display request.
    ///
    /// Never shows more than one message: the request is shown, stacked,
    /// deferred, discarded, or rejected.
    pub fn present(&mut self, message: Message) -> PresentOutcome {
        let _span = tracing::debug_span!("present", message_id = %message.id()).entered();

        if let Err(outcome) = self.validate(Stage::Present, &message) {
            return outcome;
        }

        let choice = self
            .delegate()
            .map(|delegate| delegate.display_choice(&message))
            .unwrap_or_default();

        match choice {
            DisplayChoice::Discard => {
                tracing::info!(message_id = %message.id(), "delegate discarded message");
                message.discard_source();
                PresentOutcome::Discarded
            }
            DisplayChoice::Later => {
                tracing::info!(message_id = %message.id(), "delegate deferred message");
                self.stack.push(message);
                PresentOutcome::Deferred
            }
            DisplayChoice::Now => self.present_now(message),
        }
    }

    /// Retry the most recently stacked message.
    ///
    /// Returns `None` when the stack is empty. The entry is only removed from
    /// the stack once it is actually shown or dropped as stale.
    pub fn present_next(&mut self) -> Option<PresentOutcome> {
        let next = self.stack.peek_last().cloned()?;
        let _span = tracing::debug_span!("present_next", message_id = %next.id()).entered();
        Some(self.present_now(next))
    }

    /// Final validation and display.
    fn present_now(&mut self, message: Message) -> PresentOutcome {
        // Host or source state may have changed since the message was queued
        if let Err(outcome) = self.validate(Stage::PresentNow, &message) {
            return outcome;
        }

        self.stack.remove_all(message.id());

        let scenes = self.host.supports_scenes();
        let mut context = self.build_context(&message, scenes);
        if let Some(delegate) = self.delegate() {
            delegate.prepare(&message, &mut context);
        }

        let view = match context.custom_view.clone() {
            Some(view) => Some(view),
            None => self
                .views
                .build_view(&message, &context.attributes, self.media.as_deref()),
        };
        let Some(view) = view else {
            message.discard_source();
            self.report(&message, &PresentError::NoRenderableView);
            return PresentOutcome::Rejected(PresentError::NoRenderableView);
        };

        let scene = if scenes { context.scene } else { None };
        let surface = self
            .surfaces
            .create_surface(view, scene, &context.surface_options());

        tracing::info!(
            message_id = %message.id(),
            layout = ?context.attributes.layout,
            window_level = context.window_level.0,
            ?scene,
            "presenting message"
        );

        let close = message.close_policy();
        self.state = SlotState::Occupied(ActiveSession {
            message,
            surface,
            timer: None,
        });

        if let ClosePolicy::Auto(duration) = close {
            self.schedule_auto_dismiss(duration);
        }

        let animated = context.attributes.animate_in
            && self.config.animate_reveal
            && self.host.supports_animated_reveal();
        if let SlotState::Occupied(session) = &mut self.state {
            session.surface.set_visible(true, animated);
        }

        PresentOutcome::Presented
    }

    /// Run the guard pipeline and apply the failing guard's side effect.
    fn validate(&mut self, stage: Stage, message: &Message) -> Result<(), PresentOutcome> {
        let result = {
            let env = GuardEnv {
                ui_thread: self.ui_thread,
                headless: self.config.headless_mode,
                active: self.active_message().map(Message::id),
                stack_when_busy: self.config.stack_when_busy,
                host: self.host.as_ref(),
                icons: self.icons.as_ref(),
            };
            guards::run(stage, message, &env)
        };

        match result {
            Ok(passed) => {
                // Warnings reach the source once per attempt, from the final pass
                if stage == Stage::PresentNow {
                    for warning in &passed.warnings {
                        self.report(message, warning);
                    }
                }
                Ok(())
            }
            Err(Rejection { guard, error, effect }) => {
                tracing::debug!(message_id = %message.id(), ?stage, ?guard, ?effect, "guard rejected message");
                self.report(message, &error);
                match effect {
                    FailureEffect::None => Err(PresentOutcome::Rejected(error)),
                    FailureEffect::Stack => {
                        self.stack.push(message.clone());
                        Err(PresentOutcome::Stacked)
                    }
                    FailureEffect::DropAndDiscard => {
                        self.stack.remove_all(message.id());
                        message.discard_source();
                        Err(PresentOutcome::Rejected(error))
                    }
                }
            }
        }
    }

    /// Fresh presentation context seeded from config and host state.
    fn build_context(&self, message: &Message, scenes: bool) -> PresentationContext {
        PresentationContext {
            attributes: RenderAttributes::for_message(message),
            custom_view: None,
            orientation: message.orientation(),
            status_bar: self.config.status_bar,
            window_level: self.config.default_window_level,
            preferences_proxy: self.host.presentation_anchor(),
            scene: if scenes { self.host.active_scene() } else { None },
        }
    }
}
