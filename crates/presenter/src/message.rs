//! Message data model
//!
//! A [`Message`] is an immutable display request. The presenter never mutates
//! one; it only reads its attributes and talks to its source context.

use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::source::SourceContext;

/// Process-unique message identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    /// Allocate the next identity.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// How a displayed message goes away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClosePolicy {
    /// Stays until dismissed by the user or the host
    #[default]
    Manual,
    /// Dismissed automatically after the duration
    Auto(Duration),
}

/// Orientation a message needs in order to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrientationRequirement {
    /// Renders in either orientation
    #[default]
    Any,
    Portrait,
    Landscape,
}

/// Layout family of the message content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Thin strip at the screen edge
    #[default]
    Banner,
    /// Centered dialog over a dimmed background
    Modal,
    /// Full-width card with up to two actions
    Card,
    /// A single image, tap to act
    ImageOnly,
}

impl Layout {
    /// Whether the rest of the screen is dimmed behind this layout.
    pub fn dims_background(self) -> bool {
        !matches!(self, Layout::Banner)
    }
}

/// Kind of media attached to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Still,
    Gif,
}

/// Image or animation shown with the message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    pub kind: MediaKind,
}

/// What the message says; rendering is left to the view builder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageContent {
    pub layout: Layout,
    pub title: String,
    pub body: String,
    pub media: Option<Media>,
}

/// An in-app message display request
#[derive(Clone)]
pub struct Message {
    id: MessageId,
    content: MessageContent,
    close: ClosePolicy,
    orientation: OrientationRequirement,
    animate_in: bool,
    source: Option<Weak<dyn SourceContext>>,
}

impl Message {
    /// Create a manually-closed message with no source context.
    pub fn new(content: MessageContent) -> Self {
        Self {
            id: MessageId::new(),
            content,
            close: ClosePolicy::Manual,
            orientation: OrientationRequirement::Any,
            animate_in: false,
            source: None,
        }
    }

    /// Create a banner with the given title.
    pub fn banner(title: impl Into<String>) -> Self {
        Self::new(MessageContent {
            layout: Layout::Banner,
            title: title.into(),
            ..MessageContent::default()
        })
    }

    /// Attach the upstream source context. Only a weak reference is kept.
    #[must_use]
    pub fn with_source<S: SourceContext + 'static>(mut self, source: &Rc<S>) -> Self {
        let source: Rc<dyn SourceContext> = source.clone();
        self.source = Some(Rc::downgrade(&source));
        self
    }

    #[must_use]
    pub fn with_close_policy(mut self, close: ClosePolicy) -> Self {
        self.close = close;
        self
    }

    /// Dismiss automatically after `duration`.
    #[must_use]
    pub fn auto_dismiss(self, duration: Duration) -> Self {
        self.with_close_policy(ClosePolicy::Auto(duration))
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: OrientationRequirement) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn animated(mut self, animate_in: bool) -> Self {
        self.animate_in = animate_in;
        self
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn content(&self) -> &MessageContent {
        &self.content
    }

    pub fn close_policy(&self) -> ClosePolicy {
        self.close
    }

    pub fn orientation(&self) -> OrientationRequirement {
        self.orientation
    }

    pub fn animate_in(&self) -> bool {
        self.animate_in
    }

    /// The source context, if one was attached and is still alive.
    ///
    /// A source that has been dropped upstream reads as absent.
    pub fn source(&self) -> Option<Rc<dyn SourceContext>> {
        self.source.as_ref().and_then(Weak::upgrade)
    }

    /// Ask the source context to discard this message. No-op without one.
    pub fn discard_source(&self) {
        if let Some(source) = self.source() {
            source.discard();
        }
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Message {}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("id", &self.id)
            .field("layout", &self.content.layout)
            .field("title", &self.content.title)
            .field("close", &self.close)
            .field("orientation", &self.orientation)
            .field("animate_in", &self.animate_in)
            .field("has_source", &self.source().is_some())
            .finish()
    }
}

/// Per-attempt rendering attributes derived from a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderAttributes {
    pub layout: Layout,
    pub animate_in: bool,
    pub dim_background: bool,
}

impl RenderAttributes {
    pub fn for_message(message: &Message) -> Self {
        let layout = message.content.layout;
        Self {
            layout,
            animate_in: message.animate_in,
            dim_background: layout.dims_background(),
        }
    }
}
