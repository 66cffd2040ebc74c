//! Host customization hooks
//!
//! A [`PresentationDelegate`] decides whether a message is shown now, later,
//! or never, and may rewrite how it is shown. Every hook has a default, so a
//! host implements only what it cares about. The presenter keeps a weak
//! reference; a dropped delegate means defaults.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::host::{AnchorHandle, MessageView, SceneHandle, SurfaceOptions};
use crate::message::{Message, OrientationRequirement, RenderAttributes};

/// What to do with an incoming message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayChoice {
    /// Show it immediately
    #[default]
    Now,
    /// Push it onto the pending stack
    Later,
    /// Drop it and tell its source
    Discard,
}

/// Status bar handling while a message is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBarBehavior {
    /// Keep whatever the host controller does
    #[default]
    Inherit,
    Hidden,
    Visible,
}

/// Z-order level of the overlay window
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowLevel(pub i32);

impl WindowLevel {
    pub const NORMAL: Self = Self(0);
    pub const STATUS_BAR: Self = Self(1000);
    pub const ALERT: Self = Self(2000);

    /// Just above normal application windows.
    pub const fn above_normal() -> Self {
        Self(Self::NORMAL.0 + 1)
    }
}

impl Default for WindowLevel {
    fn default() -> Self {
        Self::above_normal()
    }
}

/// Mutable per-attempt presentation record
///
/// Built fresh for every attempt and handed to the delegate's `prepare` hook
/// before any view is built.
pub struct PresentationContext {
    pub attributes: RenderAttributes,
    /// Replaces the built view when set
    pub custom_view: Option<Rc<dyn MessageView>>,
    pub orientation: OrientationRequirement,
    pub status_bar: StatusBarBehavior,
    pub window_level: WindowLevel,
    /// Host controller the presentation defers its preferences to
    pub preferences_proxy: Option<AnchorHandle>,
    /// Only honored when the host supports scenes
    pub scene: Option<SceneHandle>,
}

impl PresentationContext {
    /// Surface options as they stand after the delegate has run.
    pub fn surface_options(&self) -> SurfaceOptions {
        SurfaceOptions {
            window_level: self.window_level,
            status_bar: self.status_bar,
            orientation: self.orientation,
            anchor: self.preferences_proxy,
        }
    }
}

impl fmt::Debug for PresentationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationContext")
            .field("attributes", &self.attributes)
            .field("custom_view", &self.custom_view.as_ref().map(|v| v.describe()))
            .field("orientation", &self.orientation)
            .field("status_bar", &self.status_bar)
            .field("window_level", &self.window_level)
            .field("preferences_proxy", &self.preferences_proxy)
            .field("scene", &self.scene)
            .finish()
    }
}

/// Host-supplied presentation hooks
pub trait PresentationDelegate {
    /// Decide what happens to a message that passed validation.
    fn display_choice(&self, _message: &Message) -> DisplayChoice {
        DisplayChoice::Now
    }

    /// Adjust the presentation context before the view is built.
    fn prepare(&self, _message: &Message, _context: &mut PresentationContext) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Defaults;
    impl PresentationDelegate for Defaults {}

    #[test]
    fn default_hooks_show_now_and_leave_context() {
        let message = Message::banner("a");
        let mut context = PresentationContext {
            attributes: RenderAttributes::for_message(&message),
            custom_view: None,
            orientation: OrientationRequirement::Any,
            status_bar: StatusBarBehavior::Inherit,
            window_level: WindowLevel::default(),
            preferences_proxy: None,
            scene: None,
        };

        assert_eq!(Defaults.display_choice(&message), DisplayChoice::Now);
        Defaults.prepare(&message, &mut context);
        assert_eq!(context.window_level, WindowLevel::above_normal());
        assert!(context.custom_view.is_none());
    }

    #[test]
    fn window_levels_are_ordered() {
        assert!(WindowLevel::NORMAL < WindowLevel::above_normal());
        assert!(WindowLevel::above_normal() < WindowLevel::STATUS_BAR);
        assert!(WindowLevel::STATUS_BAR < WindowLevel::ALERT);
    }
}
