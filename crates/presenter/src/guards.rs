//! Validation pipeline
//!
//! Guards run in a fixed order and stop at the first failure:
//! thread affinity, host presentability, icon assets (never blocks),
//! exclusivity, then for the final attempt only orientation and source
//! validity.
//!
//! Guards are pure. A failure carries the side effect it asks for and the
//! presenter applies it, so no guard touches the pending stack while the
//! pipeline is still running.

use std::thread::{self, ThreadId};

use crate::error::PresentError;
use crate::host::{Host, IconRegistrar};
use crate::message::{Message, MessageId};

/// Which entry point is validating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// First pass, from `present`
    Present,
    /// Final pass right before building the view
    PresentNow,
}

/// Individual checks, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    ThreadAffinity,
    HostPresentable,
    IconAssets,
    Exclusivity,
    Orientation,
    SourceValidity,
}

impl Guard {
    /// Pipeline order for a stage.
    pub fn sequence(stage: Stage) -> &'static [Guard] {
        const PRESENT: &[Guard] = &[
            Guard::ThreadAffinity,
            Guard::HostPresentable,
            Guard::IconAssets,
            Guard::Exclusivity,
        ];
        const PRESENT_NOW: &[Guard] = &[
            Guard::ThreadAffinity,
            Guard::HostPresentable,
            Guard::IconAssets,
            Guard::Exclusivity,
            Guard::Orientation,
            Guard::SourceValidity,
        ];
        match stage {
            Stage::Present => PRESENT,
            Stage::PresentNow => PRESENT_NOW,
        }
    }
}

/// Side effect a failed guard asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureEffect {
    /// Abort only
    None,
    /// Push the message onto the pending stack
    Stack,
    /// Remove the message from the stack and discard its source
    DropAndDiscard,
}

/// A failed guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub guard: Guard,
    pub error: PresentError,
    pub effect: FailureEffect,
}

/// Non-blocking problems found while the pipeline passed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Passed {
    pub warnings: Vec<PresentError>,
}

/// Everything the guards read
pub struct GuardEnv<'a> {
    pub ui_thread: ThreadId,
    pub headless: bool,
    /// Message in the display slot, if any
    pub active: Option<MessageId>,
    pub stack_when_busy: bool,
    pub host: &'a dyn Host,
    pub icons: &'a dyn IconRegistrar,
}

/// Run the pipeline for `stage`, stopping at the first failure.
pub fn run(stage: Stage, message: &Message, env: &GuardEnv<'_>) -> Result<Passed, Rejection> {
    let mut passed = Passed::default();

    for &guard in Guard::sequence(stage) {
        match check(guard, stage, message, env) {
            Ok(()) => {}
            Err(rejection) if !rejection.error.aborts_attempt() => {
                passed.warnings.push(rejection.error);
            }
            Err(rejection) => return Err(rejection),
        }
    }

    Ok(passed)
}

/// Evaluate a single guard.
pub fn check(guard: Guard, stage: Stage, message: &Message, env: &GuardEnv<'_>) -> Result<(), Rejection> {
    let reject = |error, effect| Err(Rejection { guard, error, effect });

    match guard {
        Guard::ThreadAffinity => {
            if thread::current().id() != env.ui_thread {
                return reject(PresentError::WrongThread, FailureEffect::None);
            }
        }
        Guard::HostPresentable => {
            if !env.headless && !env.host.is_presentable() {
                return reject(PresentError::HostNotPresentable, FailureEffect::None);
            }
        }
        Guard::IconAssets => {
            if !env.icons.ensure_registered() {
                return reject(PresentError::IconAssetUnavailable, FailureEffect::None);
            }
        }
        Guard::Exclusivity => {
            if let Some(active) = env.active {
                // The active message itself is never stacked
                let effect = if stage == Stage::Present && env.stack_when_busy && active != message.id() {
                    FailureEffect::Stack
                } else {
                    FailureEffect::None
                };
                return reject(PresentError::AnotherMessageActive, effect);
            }
        }
        Guard::Orientation => {
            let required = message.orientation();
            // Unknown traits reject nothing
            if let Some(traits) = env.host.orientation_traits() {
                if !traits.supports(required) {
                    return reject(
                        PresentError::OrientationUnsupported(required),
                        FailureEffect::DropAndDiscard,
                    );
                }
            }
        }
        Guard::SourceValidity => {
            // Messages without a source are not managed upstream
            if let Some(source) = message.source() {
                if source.is_discarded() {
                    return reject(PresentError::SourceContextDiscarded, FailureEffect::DropAndDiscard);
                }
                if !source.is_valid() {
                    return reject(PresentError::SourceContextInvalid, FailureEffect::DropAndDiscard);
                }
            }
        }
    }

    Ok(())
}
