//! Headless backend for tests and scripted runs
//!
//! Nothing is drawn. Every collaborator shares its state through `Rc` handles
//! so the caller can keep a clone, flip host flags between calls, and read
//! back the [`SurfaceLog`] afterwards.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::delegate::WindowLevel;
use crate::host::{
    AnchorHandle, Collaborators, Completion, DisplaySurface, Host, IconRegistrar, MediaProvider,
    MessageView, OrientationTraits, SceneHandle, SurfaceFactory, SurfaceOptions, ViewBuilder,
};
use crate::message::{Layout, MediaKind, Message, MessageId, RenderAttributes};

/// Something a headless collaborator did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The view builder produced a view
    ViewBuilt { message: MessageId, animated_media: bool },
    /// The view builder refused a message
    ViewRefused { message: MessageId },
    /// A surface was created around a view
    Created {
        surface: u64,
        view: String,
        scene: Option<SceneHandle>,
        window_level: WindowLevel,
    },
    Shown { surface: u64, animated: bool },
    Hidden { surface: u64 },
    Dismissed { surface: u64 },
}

/// Shared, append-only record of headless collaborator activity
#[derive(Debug, Clone, Default)]
pub struct SurfaceLog {
    events: Rc<RefCell<Vec<SurfaceEvent>>>,
}

impl SurfaceLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: SurfaceEvent) {
        tracing::trace!(?event, "headless event");
        self.events.borrow_mut().push(event);
    }

    /// All events so far, oldest first.
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.borrow().clone()
    }

    /// Messages the view builder produced views for, in order.
    pub fn built(&self) -> Vec<MessageId> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::ViewBuilt { message, .. } => Some(*message),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&SurfaceEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| matches(e)).count()
    }
}

#[derive(Debug)]
struct HostFlags {
    presentable: Cell<bool>,
    traits: Cell<Option<OrientationTraits>>,
    scenes: Cell<bool>,
    animated_reveal: Cell<bool>,
    anchor: Cell<Option<AnchorHandle>>,
}

/// Host with runtime-settable presentability and orientation
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    flags: Rc<HostFlags>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    /// Presentable, all orientations, no scenes.
    pub fn new() -> Self {
        Self {
            flags: Rc::new(HostFlags {
                presentable: Cell::new(true),
                traits: Cell::new(Some(OrientationTraits::ALL)),
                scenes: Cell::new(false),
                animated_reveal: Cell::new(true),
                anchor: Cell::new(Some(AnchorHandle(1))),
            }),
        }
    }

    /// Toggle presentability; a non-presentable host has no anchor.
    pub fn set_presentable(&self, presentable: bool) {
        self.flags.presentable.set(presentable);
        self.flags.anchor.set(presentable.then_some(AnchorHandle(1)));
    }

    pub fn set_orientation_traits(&self, traits: Option<OrientationTraits>) {
        self.flags.traits.set(traits);
    }

    pub fn set_supports_scenes(&self, scenes: bool) {
        self.flags.scenes.set(scenes);
    }

    pub fn set_animated_reveal(&self, animated: bool) {
        self.flags.animated_reveal.set(animated);
    }
}

/// Scene every headless host reports when scenes are enabled
pub const HEADLESS_SCENE: SceneHandle = SceneHandle(7);

impl Host for HeadlessHost {
    fn is_presentable(&self) -> bool {
        self.flags.presentable.get()
    }

    fn orientation_traits(&self) -> Option<OrientationTraits> {
        self.flags.traits.get()
    }

    fn presentation_anchor(&self) -> Option<AnchorHandle> {
        self.flags.anchor.get()
    }

    fn supports_scenes(&self) -> bool {
        self.flags.scenes.get()
    }

    fn active_scene(&self) -> Option<SceneHandle> {
        self.flags.scenes.get().then_some(HEADLESS_SCENE)
    }

    fn supports_animated_reveal(&self) -> bool {
        self.flags.animated_reveal.get()
    }
}

/// View produced by the headless builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessView {
    pub message: MessageId,
    pub layout: Layout,
    pub title: String,
}

impl MessageView for HeadlessView {
    fn describe(&self) -> String {
        format!("{:?} {} '{}'", self.layout, self.message, self.title)
    }
}

/// Stand-in GIF renderer
#[derive(Debug, Default)]
pub struct HeadlessGifRenderer;

impl MediaProvider for HeadlessGifRenderer {
    fn name(&self) -> &str {
        "headless-gif"
    }
}

/// Builds [`HeadlessView`]s, refusing any layout marked unrenderable
#[derive(Debug, Clone)]
pub struct HeadlessViewBuilder {
    refused: Rc<RefCell<Vec<Layout>>>,
    log: SurfaceLog,
}

impl HeadlessViewBuilder {
    pub fn new(log: SurfaceLog) -> Self {
        Self {
            refused: Rc::new(RefCell::new(Vec::new())),
            log,
        }
    }

    /// Make the builder return no view for `layout`.
    pub fn refuse_layout(&self, layout: Layout) {
        self.refused.borrow_mut().push(layout);
    }

    pub fn accept_all(&self) {
        self.refused.borrow_mut().clear();
    }
}

impl ViewBuilder for HeadlessViewBuilder {
    fn build_view(
        &self,
        message: &Message,
        attributes: &RenderAttributes,
        media: Option<&dyn MediaProvider>,
    ) -> Option<Rc<dyn MessageView>> {
        if self.refused.borrow().contains(&attributes.layout) {
            self.log.record(SurfaceEvent::ViewRefused { message: message.id() });
            return None;
        }

        let is_gif = matches!(
            message.content().media.as_ref().map(|m| m.kind),
            Some(MediaKind::Gif)
        );
        self.log.record(SurfaceEvent::ViewBuilt {
            message: message.id(),
            animated_media: is_gif && media.is_some(),
        });

        Some(Rc::new(HeadlessView {
            message: message.id(),
            layout: attributes.layout,
            title: message.content().title.clone(),
        }))
    }
}

/// Surface that only records what happens to it
pub struct HeadlessSurface {
    id: u64,
    view: Rc<dyn MessageView>,
    visible: bool,
    log: SurfaceLog,
}

impl DisplaySurface for HeadlessSurface {
    fn set_visible(&mut self, visible: bool, animated: bool) {
        self.visible = visible;
        if visible {
            self.log.record(SurfaceEvent::Shown { surface: self.id, animated });
        } else {
            self.log.record(SurfaceEvent::Hidden { surface: self.id });
        }
    }

    fn dismiss(self: Box<Self>, on_complete: Option<Completion>) {
        self.log.record(SurfaceEvent::Dismissed { surface: self.id });
        // Teardown is instant without a real window
        if let Some(on_complete) = on_complete {
            on_complete();
        }
    }

    fn is_active(&self) -> bool {
        self.visible
    }

    fn view(&self) -> Rc<dyn MessageView> {
        Rc::clone(&self.view)
    }
}

/// Creates [`HeadlessSurface`]s with sequential ids
#[derive(Debug, Clone)]
pub struct HeadlessSurfaceFactory {
    next_id: Rc<Cell<u64>>,
    log: SurfaceLog,
}

impl HeadlessSurfaceFactory {
    pub fn new(log: SurfaceLog) -> Self {
        Self {
            next_id: Rc::new(Cell::new(1)),
            log,
        }
    }
}

impl SurfaceFactory for HeadlessSurfaceFactory {
    fn create_surface(
        &self,
        root_view: Rc<dyn MessageView>,
        scene: Option<SceneHandle>,
        options: &SurfaceOptions,
    ) -> Box<dyn DisplaySurface> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        self.log.record(SurfaceEvent::Created {
            surface: id,
            view: root_view.describe(),
            scene,
            window_level: options.window_level,
        });

        Box::new(HeadlessSurface {
            id,
            view: root_view,
            visible: false,
            log: self.log.clone(),
        })
    }
}

/// Icon registrar whose result can be toggled
#[derive(Debug, Clone)]
pub struct HeadlessIcons {
    available: Rc<Cell<bool>>,
}

impl Default for HeadlessIcons {
    fn default() -> Self {
        Self {
            available: Rc::new(Cell::new(true)),
        }
    }
}

impl HeadlessIcons {
    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }
}

impl IconRegistrar for HeadlessIcons {
    fn ensure_registered(&self) -> bool {
        self.available.get()
    }
}

/// All headless collaborators, sharing one log
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    pub host: HeadlessHost,
    pub views: HeadlessViewBuilder,
    pub surfaces: HeadlessSurfaceFactory,
    pub icons: HeadlessIcons,
    pub log: SurfaceLog,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    pub fn new() -> Self {
        let log = SurfaceLog::new();
        Self {
            host: HeadlessHost::new(),
            views: HeadlessViewBuilder::new(log.clone()),
            surfaces: HeadlessSurfaceFactory::new(log.clone()),
            icons: HeadlessIcons::default(),
            log,
        }
    }

    /// Boxed collaborators for a presenter; this backend keeps shared handles.
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            host: Box::new(self.host.clone()),
            views: Box::new(self.views.clone()),
            surfaces: Box::new(self.surfaces.clone()),
            icons: Box::new(self.icons.clone()),
            media: Some(Rc::new(HeadlessGifRenderer)),
        }
    }
}
