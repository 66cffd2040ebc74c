//! Presentation errors
//!
//! None of these escape the presenter as a panic or `Err`. Each one is
//! reported to the message's source context (or the process log) and the
//! triggering operation stops.

use thiserror::Error;

use crate::message::OrientationRequirement;

/// Why a presentation attempt did not go ahead
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentError {
    /// Called from a thread other than the host UI thread
    #[error("presenter used off the UI thread")]
    WrongThread,

    /// No anchor to present against (ignored in headless mode)
    #[error("host cannot present right now")]
    HostNotPresentable,

    /// Icon font registration failed; presentation continues
    #[error("icon assets are unavailable")]
    IconAssetUnavailable,

    /// Another message already owns the display slot
    #[error("another message is already displayed")]
    AnotherMessageActive,

    /// The view builder produced nothing for this message
    #[error("no message view could be built")]
    NoRenderableView,

    /// The host cannot show the orientation the message requires
    #[error("orientation {0:?} is not supported by the host")]
    OrientationUnsupported(OrientationRequirement),

    /// The upstream source discarded the message
    #[error("message source was discarded")]
    SourceContextDiscarded,

    /// The upstream source no longer considers the message valid
    #[error("message source is no longer valid")]
    SourceContextInvalid,
}

impl PresentError {
    /// Whether the attempt continues after this error is reported.
    pub fn aborts_attempt(&self) -> bool {
        !matches!(self, PresentError::IconAssetUnavailable)
    }
}
