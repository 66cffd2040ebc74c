//! Host collaborator interfaces
//!
//! The presenter does not render anything itself. Everything platform-facing
//! goes through these traits: presentability and orientation queries, view
//! construction, the overlay surface, and icon font registration.

use std::fmt;
use std::rc::Rc;

use crate::message::{Message, OrientationRequirement, RenderAttributes};

/// Opaque handle to the host's topmost presentation controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorHandle(pub u64);

/// Opaque handle to a display scene on hosts that have them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneHandle(pub u64);

/// Orientations the host can currently show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientationTraits {
    pub portrait: bool,
    pub landscape: bool,
}

impl OrientationTraits {
    pub const ALL: Self = Self { portrait: true, landscape: true };
    pub const PORTRAIT: Self = Self { portrait: true, landscape: false };
    pub const LANDSCAPE: Self = Self { portrait: false, landscape: true };

    /// Whether a message with this requirement can be shown.
    pub fn supports(&self, requirement: OrientationRequirement) -> bool {
        match requirement {
            OrientationRequirement::Any => self.portrait || self.landscape,
            OrientationRequirement::Portrait => self.portrait,
            OrientationRequirement::Landscape => self.landscape,
        }
    }
}

/// Host UI state queried at every validation step
///
/// Values are never cached across an attempt.
pub trait Host {
    /// Whether there is something to present against.
    fn is_presentable(&self) -> bool;

    /// Current orientation capabilities. `None` means unknown; nothing is rejected.
    fn orientation_traits(&self) -> Option<OrientationTraits>;

    /// The controller a presentation should be anchored to.
    fn presentation_anchor(&self) -> Option<AnchorHandle>;

    /// Whether this platform binds overlays to display scenes.
    fn supports_scenes(&self) -> bool {
        false
    }

    /// Scene to bind to when scenes are supported.
    fn active_scene(&self) -> Option<SceneHandle> {
        None
    }

    /// Whether the platform can animate a surface in.
    fn supports_animated_reveal(&self) -> bool {
        true
    }
}

/// A rendered message view
pub trait MessageView: fmt::Debug {
    /// Short label for logs.
    fn describe(&self) -> String;
}

/// Renders animated media (GIFs) for the view builder
pub trait MediaProvider: fmt::Debug {
    fn name(&self) -> &str;
}

/// Builds content views; returns `None` when the message cannot be rendered
pub trait ViewBuilder {
    fn build_view(
        &self,
        message: &Message,
        attributes: &RenderAttributes,
        media: Option<&dyn MediaProvider>,
    ) -> Option<Rc<dyn MessageView>>;
}

/// Window-level surface options settled by the presentation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceOptions {
    pub window_level: crate::delegate::WindowLevel,
    pub status_bar: crate::delegate::StatusBarBehavior,
    pub orientation: OrientationRequirement,
    pub anchor: Option<AnchorHandle>,
}

/// Callback run once a surface has finished tearing down
pub type Completion = Box<dyn FnOnce()>;

/// The overlay window and root controller showing one message
pub trait DisplaySurface {
    /// Show or hide the surface.
    fn set_visible(&mut self, visible: bool, animated: bool);

    /// Tear the surface down; `on_complete` runs when teardown finishes.
    fn dismiss(self: Box<Self>, on_complete: Option<Completion>);

    /// Whether the surface is still on screen.
    fn is_active(&self) -> bool;

    /// The content view the surface was built around.
    fn view(&self) -> Rc<dyn MessageView>;
}

/// Creates display surfaces
pub trait SurfaceFactory {
    fn create_surface(
        &self,
        root_view: Rc<dyn MessageView>,
        scene: Option<SceneHandle>,
        options: &SurfaceOptions,
    ) -> Box<dyn DisplaySurface>;
}

/// Registers the icon font used by message chrome
pub trait IconRegistrar {
    /// Returns `false` when registration failed.
    fn ensure_registered(&self) -> bool;
}

/// The full set of platform collaborators a presenter needs
pub struct Collaborators {
    pub host: Box<dyn Host>,
    pub views: Box<dyn ViewBuilder>,
    pub surfaces: Box<dyn SurfaceFactory>,
    pub icons: Box<dyn IconRegistrar>,
    pub media: Option<Rc<dyn MediaProvider>>,
}
