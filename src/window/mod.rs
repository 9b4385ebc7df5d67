// Window controller: owns committed geometry and the in-flight session of one floating panel.

pub mod drag_handle;
pub mod model;
pub mod resizers;
pub mod resolve;
pub mod store;

use crate::geometry::{unit_to_percent, PixelRect, PixelSize};
use crate::input::document::{Document, ListenerKind};
use crate::input::{CursorType, NavKey};
use crate::stage::LayoutProbe;

use drag_handle::{DragHandle, HandleSignal};
use hit_test::{hit_test_handle, HandleId, HandleMetrics};
use model::{GeometryPatch, TransientDelta, WindowGeometry};
use resizers::{ResizeEdge, Resizers};
use resolve::SessionBasis;

/// Percentage a window moves per arrow key press.
pub const DEFAULT_MOVE_STEP: f64 = 2.0;

/// Percentage an edge grows or shrinks per arrow key press.
pub const DEFAULT_RESIZE_STEP: f64 = 2.0;

/// Smallest width/height a resize may leave, in percent.
pub const DEFAULT_MIN_SIZE: f64 = 5.0;

/// Receives committed geometry at the end of every interaction.
///
/// Only the fields the interaction governs are set; the receiver merges them.
pub trait GeometrySink {
    fn commit(&mut self, window_name: &str, patch: GeometryPatch);
}

impl<F> GeometrySink for F
where
    F: FnMut(&str, GeometryPatch),
{
    fn commit(&mut self, window_name: &str, patch: GeometryPatch) {
        self(window_name, patch)
    }
}

/// What the wrapped content sees on each render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentProps<'a> {
    pub window_name: &'a str,
    pub geometry: WindowGeometry,
    pub locked: bool,
    pub interacting: bool,
}

/// Arbitrary content hosted inside a window.
pub trait WindowContent {
    type Output;

    fn render(&self, props: &ContentProps<'_>) -> Self::Output;
}

impl<F, T> WindowContent for F
where
    F: Fn(&ContentProps<'_>) -> T,
{
    type Output = T;

    fn render(&self, props: &ContentProps<'_>) -> T {
        self(props)
    }
}

/// Inputs the controller reads on every render.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowProps {
    pub window_name: String,
    pub geometry: WindowGeometry,
    /// Selector of the container that defines the 0–100 coordinate space.
    pub boundary_selector: String,
    /// Locked windows ignore every gesture.
    pub locked: bool,
}

/// Step sizes, limits, and handle dimensions shared by all windows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowBehavior {
    pub move_step: f64,
    pub resize_step: f64,
    pub min_size: f64,
    pub metrics: HandleMetrics,
}

impl Default for WindowBehavior {
    fn default() -> Self {
        Self {
            move_step: DEFAULT_MOVE_STEP,
            resize_step: DEFAULT_RESIZE_STEP,
            min_size: DEFAULT_MIN_SIZE,
            metrics: HandleMetrics::default(),
        }
    }
}

/// Effects the host should apply after an input event.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEffect {
    /// No visible effect.
    None,
    /// Transient state changed; re-render the frame.
    Redraw,
    /// Change the pointer cursor.
    SetCursor(CursorType),
    /// Geometry was committed through the sink.
    Committed(GeometryPatch),
}

/// Which gesture a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Drag,
    Resize(ResizeEdge),
}

impl Gesture {
    fn handle(self) -> HandleId {
        match self {
            Gesture::Drag => HandleId::Drag,
            Gesture::Resize(edge) => HandleId::Resize(edge),
        }
    }
}

/// State that exists only between session start and end.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Session {
    gesture: Gesture,
    basis: SessionBasis,
    transient: TransientDelta,
}

/// Rendered placement of a window: committed percentages plus transient deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStyle {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    /// Pixel translation applied on top of `left`/`top`.
    pub translate_x: f64,
    pub translate_y: f64,
}

impl WindowStyle {
    /// Inline CSS declaration for hosts that render into a web view.
    pub fn to_css(&self) -> String {
        format!(
            "height: {}%; left: {}%; top: {}%; transform: translate3d({}px, {}px, 0); width: {}%",
            self.height, self.left, self.top, self.translate_x, self.translate_y, self.width
        )
    }
}

/// One rendered window: placement, handle state, and the content's output.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowFrame<T> {
    pub window_name: String,
    pub style: WindowStyle,
    pub locked: bool,
    /// Handle holding the current pointer session.
    pub active_handle: Option<HandleId>,
    /// Handle with keyboard focus.
    pub focused_handle: Option<HandleId>,
    pub cursor: CursorType,
    pub content: T,
}

/// A draggable, resizable, keyboard-operable window wrapping `C`.
///
/// Committed geometry changes only in [`WindowController::sync_geometry`]
/// (external updates) and in the private commit path, which also feeds the sink.
pub struct WindowController<C, S> {
    props: WindowProps,
    behavior: WindowBehavior,
    content: C,
    sink: S,
    document: Document,
    drag_handle: DragHandle,
    resizers: Resizers,
    session: Option<Session>,
    hovered: Option<HandleId>,
    cursor_pos: (f64, f64),
}

impl<C, S> std::fmt::Debug for WindowController<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowController")
            .field("props", &self.props)
            .field("session", &self.session)
            .field("hovered", &self.hovered)
            .finish_non_exhaustive()
    }
}

impl<C: WindowContent, S: GeometrySink> WindowController<C, S> {
    pub fn new(props: WindowProps, behavior: WindowBehavior, content: C, sink: S, document: Document) -> Self {
        let drag_handle = DragHandle::new(&props.window_name);
        let resizers = Resizers::new(&props.window_name);
        Self {
            props,
            behavior,
            content,
            sink,
            document,
            drag_handle,
            resizers,
            session: None,
            hovered: None,
            cursor_pos: (0.0, 0.0),
        }
    }

    pub fn name(&self) -> &str {
        &self.props.window_name
    }

    pub fn props(&self) -> &WindowProps {
        &self.props
    }

    /// Committed geometry.
    pub fn geometry(&self) -> WindowGeometry {
        self.props.geometry
    }

    /// Transient delta of the running session; zero when idle.
    pub fn transient(&self) -> TransientDelta {
        self.session.map(|s| s.transient).unwrap_or_default()
    }

    /// Gesture of the running session, if any.
    pub fn gesture(&self) -> Option<Gesture> {
        self.session.map(|s| s.gesture)
    }

    pub fn is_interacting(&self) -> bool {
        self.session.is_some()
    }

    /// Handle currently under the pointer.
    pub fn hovered(&self) -> Option<HandleId> {
        self.hovered
    }

    pub fn focused_handle(&self) -> Option<HandleId> {
        if self.drag_handle.is_focused() {
            return Some(HandleId::Drag);
        }
        self.resizers.focused_edge().map(HandleId::Resize)
    }

    /// Move keyboard focus to a handle of this window, or clear it.
    pub fn set_focus(&mut self, handle: Option<HandleId>) {
        self.drag_handle.set_focused(handle == Some(HandleId::Drag));
        let edge = match handle {
            Some(HandleId::Resize(edge)) => Some(edge),
            _ => None,
        };
        self.resizers.set_focus(edge);
    }

    /// Replace committed geometry with the value held by the external store.
    ///
    /// Ignored while a session runs: committed state never changes mid-gesture.
    pub fn sync_geometry(&mut self, geometry: WindowGeometry) {
        if self.session.is_some() {
            log::debug!("{}: deferring geometry sync until the session ends", self.props.window_name);
            return;
        }
        self.props.geometry = geometry;
    }

    /// Locking discards a running session without committing it.
    pub fn set_locked(&mut self, locked: bool) {
        self.props.locked = locked;
        if locked {
            self.hovered = None;
            self.cancel_session();
        }
    }

    /// Rendered rect of the panel: measured by the host when available,
    /// otherwise committed geometry projected onto `container`.
    fn panel_rect(&self, probe: &dyn LayoutProbe, container: PixelSize) -> PixelRect {
        probe
            .panel_rect(&self.props.window_name)
            .unwrap_or_else(|| self.props.geometry.project(container))
    }

    /// Measure the boundary container. A missing container counts as zero-sized.
    fn measure_container(&self, probe: &dyn LayoutProbe) -> PixelSize {
        match probe.boundary_size(&self.props.boundary_selector) {
            Some(size) => size,
            None => {
                log::warn!(
                    "{}: no boundary container matches '{}'",
                    self.props.window_name,
                    self.props.boundary_selector
                );
                PixelSize::ZERO
            }
        }
    }

    /// Handle of this window that holds document listeners of `kind`.
    fn listening_handle(&self, kind: ListenerKind) -> Option<HandleId> {
        self.document
            .owners(kind)
            .into_iter()
            .find(|owner| owner.window == self.props.window_name)
            .map(|owner| owner.handle)
    }

    /// Which handle of this window lies under `(x, y)`.
    pub fn hit_test(&self, x: f64, y: f64, probe: &dyn LayoutProbe) -> Option<HandleId> {
        if self.props.locked {
            return None;
        }
        let container = probe
            .boundary_size(&self.props.boundary_selector)
            .unwrap_or(PixelSize::ZERO);
        if container.is_degenerate() {
            return None;
        }
        hit_test_handle((x, y), self.panel_rect(probe, container), self.behavior.metrics)
    }

    /// Forget the hovered handle. Returns the effect of leaving it.
    pub fn clear_hover(&mut self) -> WindowEffect {
        match self.hovered.take() {
            Some(_) => WindowEffect::SetCursor(CursorType::Default),
            None => WindowEffect::None,
        }
    }

    // ── Pointer input ────────────────────────────────────────────────

    /// Process a pointer move anywhere on the surface.
    ///
    /// During a session the move goes to the handle holding document listeners;
    /// otherwise it updates hover state.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64, probe: &dyn LayoutProbe) -> WindowEffect {
        self.cursor_pos = (x, y);

        if let Some(handle) = self.listening_handle(ListenerKind::PointerMove) {
            let signal = match handle {
                HandleId::Drag => self.drag_handle.pointer_move(x, y),
                HandleId::Resize(edge) => self.resizers.pointer_move(edge, x, y).map(|s| s.signal),
            };
            return match signal {
                Some(HandleSignal::Update { dx, dy }) => self.update_session(dx, dy),
                _ => WindowEffect::None,
            };
        }

        let hit = self.hit_test(x, y, probe);
        if hit == self.hovered {
            return WindowEffect::None;
        }
        self.hovered = hit;
        WindowEffect::SetCursor(hit.map_or(CursorType::Default, HandleId::cursor))
    }

    /// Process a pointer press at the last known cursor position.
    pub fn on_mouse_press(&mut self, probe: &dyn LayoutProbe) -> WindowEffect {
        match self.hovered {
            Some(handle) => {
                let (x, y) = self.cursor_pos;
                self.press_handle(handle, x, y, probe)
            }
            None => WindowEffect::None,
        }
    }

    /// Process a pointer release anywhere on the surface.
    pub fn on_mouse_release(&mut self) -> WindowEffect {
        let signal = match self.listening_handle(ListenerKind::PointerUp) {
            Some(HandleId::Drag) => self.drag_handle.pointer_up(),
            Some(HandleId::Resize(edge)) => self.resizers.pointer_up(edge).map(|s| s.signal),
            None => None,
        };
        match signal {
            Some(HandleSignal::End) => self.end_session(),
            _ => WindowEffect::None,
        }
    }

    /// Press a specific handle at `(x, y)`, for hosts that do their own hit-testing.
    ///
    /// A session still running from an earlier press ends first, exactly as if
    /// the pointer had been released.
    pub fn press_handle(&mut self, handle: HandleId, x: f64, y: f64, probe: &dyn LayoutProbe) -> WindowEffect {
        if self.props.locked {
            return WindowEffect::None;
        }
        if self.session.is_some() {
            log::debug!("{}: press during a running session, ending it first", self.props.window_name);
            self.on_mouse_release();
        }
        self.cursor_pos = (x, y);
        let signal = match handle {
            HandleId::Drag => {
                self.resizers.set_focus(None);
                self.drag_handle.pointer_down(x, y, &self.document)
            }
            HandleId::Resize(edge) => {
                self.drag_handle.set_focused(false);
                self.resizers.pointer_down(edge, x, y, &self.document).signal
            }
        };
        debug_assert_eq!(signal, HandleSignal::Start);

        let gesture = match handle {
            HandleId::Drag => Gesture::Drag,
            HandleId::Resize(edge) => Gesture::Resize(edge),
        };
        self.begin_session(gesture, probe);
        // A click without movement still resolves once, so it commits a position.
        self.update_session(0.0, 0.0)
    }

    // ── Keyboard input ───────────────────────────────────────────────

    /// Process a key press on the focused handle of this window.
    pub fn on_key(&mut self, key: NavKey, probe: &dyn LayoutProbe) -> WindowEffect {
        if self.props.locked {
            return WindowEffect::None;
        }
        let Some(handle) = self.focused_handle() else {
            return WindowEffect::None;
        };
        let signal = match handle {
            HandleId::Drag => self.drag_handle.key_down(key),
            HandleId::Resize(edge) => self.resizers.key_down(edge, key).map(|s| s.signal),
        };
        match signal {
            Some(HandleSignal::End) => self.end_session(),
            Some(HandleSignal::Key(key)) if self.session.is_none() => match handle {
                HandleId::Drag => self.move_by_key(key, probe),
                HandleId::Resize(edge) => self.resize_by_key(key, edge),
            },
            _ => WindowEffect::None,
        }
    }

    fn move_by_key(&mut self, key: NavKey, probe: &dyn LayoutProbe) -> WindowEffect {
        let container = self.measure_container(probe);
        if container.is_degenerate() {
            return WindowEffect::None;
        }
        let rect = self.panel_rect(probe, container);
        let size = (
            unit_to_percent(rect.width, container.width),
            unit_to_percent(rect.height, container.height),
        );
        let patch = resolve::move_by_key(key, &self.props.geometry, size, self.behavior.move_step);
        self.commit(patch)
    }

    fn resize_by_key(&mut self, key: NavKey, edge: ResizeEdge) -> WindowEffect {
        let patch = resolve::resize_by_key_all(
            key,
            edge.directions(),
            &self.props.geometry,
            self.behavior.resize_step,
            self.behavior.min_size,
        );
        self.commit(patch)
    }

    // ── Session lifecycle ────────────────────────────────────────────

    fn begin_session(&mut self, gesture: Gesture, probe: &dyn LayoutProbe) {
        let container = self.measure_container(probe);
        let origin = self.panel_rect(probe, container);
        log::debug!(
            "{}: {:?} session started in {}x{} container",
            self.props.window_name,
            gesture,
            container.width,
            container.height
        );
        self.session = Some(Session {
            gesture,
            basis: SessionBasis {
                committed: self.props.geometry,
                container,
                origin,
                min_size: self.behavior.min_size,
            },
            transient: TransientDelta::default(),
        });
    }

    fn update_session(&mut self, dx: f64, dy: f64) -> WindowEffect {
        let Some(session) = self.session.as_mut() else {
            return WindowEffect::None;
        };
        if session.basis.container.is_degenerate() {
            return WindowEffect::None;
        }
        let patch = match session.gesture {
            Gesture::Drag => resolve::resolve_drag(dx, dy, &session.basis),
            Gesture::Resize(edge) => resolve::resolve_resize_all(edge.directions(), dx, dy, &session.basis),
        };
        session.transient.apply(patch);
        WindowEffect::Redraw
    }

    fn end_session(&mut self) -> WindowEffect {
        let Some(session) = self.session.take() else {
            return WindowEffect::None;
        };
        log::debug!("{}: {:?} session ended", self.props.window_name, session.gesture);
        if session.basis.container.is_degenerate() {
            return WindowEffect::None;
        }
        let patch = match session.gesture {
            Gesture::Drag => resolve::drag_commit(&session.transient, &session.basis),
            Gesture::Resize(edge) => resolve::resize_commit(edge.directions(), &session.transient, &session.basis),
        };
        self.commit(patch)
    }

    /// Stop a running session without committing; transient state is dropped.
    pub fn cancel_session(&mut self) -> WindowEffect {
        match self.listening_handle(ListenerKind::PointerUp) {
            Some(HandleId::Drag) => {
                self.drag_handle.pointer_up();
            }
            Some(HandleId::Resize(edge)) => {
                self.resizers.pointer_up(edge);
            }
            None => {}
        }
        match self.session.take() {
            Some(session) => {
                log::debug!("{}: {:?} session discarded", self.props.window_name, session.gesture);
                WindowEffect::Redraw
            }
            None => WindowEffect::None,
        }
    }

    /// The one place committed geometry changes in response to a gesture.
    fn commit(&mut self, patch: GeometryPatch) -> WindowEffect {
        if patch.is_empty() {
            return WindowEffect::None;
        }
        let confined = patch.apply_to(&self.props.geometry).confined();
        let patch = patch.pick(&confined);
        self.props.geometry = patch.apply_to(&self.props.geometry);
        log::debug!("{}: commit {:?}", self.props.window_name, patch);
        self.sink.commit(&self.props.window_name, patch);
        WindowEffect::Committed(patch)
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Current placement plus the wrapped content's output.
    pub fn frame(&self) -> WindowFrame<C::Output> {
        let g = self.props.geometry;
        let t = self.transient();
        let active_handle = self.session.map(|s| s.gesture.handle());
        let cursor = match active_handle.or(self.hovered) {
            Some(HandleId::Drag) => self.drag_handle.cursor(),
            Some(handle) => handle.cursor(),
            None => CursorType::Default,
        };
        let content = self.content.render(&ContentProps {
            window_name: &self.props.window_name,
            geometry: g,
            locked: self.props.locked,
            interacting: self.session.is_some(),
        });
        WindowFrame {
            window_name: self.props.window_name.clone(),
            style: WindowStyle {
                top: g.top,
                left: g.left,
                width: g.width + t.width_diff,
                height: g.height + t.height_diff,
                translate_x: t.left_diff,
                translate_y: t.top_diff,
            },
            locked: self.props.locked,
            active_handle,
            focused_handle: self.focused_handle(),
            cursor,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Stage;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const SELECTOR: &str = "#player-surface";
    const EPS: f64 = 1e-9;

    type Commits = Rc<RefCell<Vec<(String, GeometryPatch)>>>;
    type Sink = Box<dyn FnMut(&str, GeometryPatch)>;
    type Label = fn(&ContentProps<'_>) -> String;

    fn label(props: &ContentProps<'_>) -> String {
        format!("{} ({})", props.window_name, props.interacting)
    }

    fn stage() -> Stage {
        let mut stage = Stage::new();
        stage.set_boundary(SELECTOR, PixelSize::new(500.0, 300.0));
        stage
    }

    fn controller(geometry: WindowGeometry) -> (WindowController<Label, Sink>, Commits, Document) {
        let commits: Commits = Rc::default();
        let log = Rc::clone(&commits);
        let sink: Sink = Box::new(move |name: &str, patch| log.borrow_mut().push((name.to_string(), patch)));
        let document = Document::new();
        let props = WindowProps {
            window_name: "slides".to_string(),
            geometry,
            boundary_selector: SELECTOR.to_string(),
            locked: false,
        };
        let ctl = WindowController::new(props, WindowBehavior::default(), label as Label, sink, document.clone());
        (ctl, commits, document)
    }

    fn default_controller() -> (WindowController<Label, Sink>, Commits, Document) {
        controller(WindowGeometry::new(10.0, 10.0, 20.0, 20.0))
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    // ── Drag sessions ────────────────────────────────────────────────

    #[test]
    fn initial_state_is_idle() {
        let (ctl, commits, doc) = default_controller();
        assert!(!ctl.is_interacting());
        assert!(ctl.transient().is_zero());
        assert!(commits.borrow().is_empty());
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn drag_updates_transient_then_commits() {
        let (mut ctl, commits, doc) = default_controller();
        let stage = stage();
        assert_eq!(ctl.press_handle(HandleId::Drag, 100.0, 40.0, &stage), WindowEffect::Redraw);
        assert_eq!(doc.listener_count(), 2);

        assert_eq!(ctl.on_cursor_moved(300.0, 90.0, &stage), WindowEffect::Redraw);
        let t = ctl.transient();
        assert_eq!(t.left_diff, 200.0);
        assert_eq!(t.top_diff, 50.0);
        assert!(close(unit_to_percent(t.left_diff, 500.0), 40.0));
        // Committed geometry is untouched mid-drag.
        assert_eq!(ctl.geometry(), WindowGeometry::new(10.0, 10.0, 20.0, 20.0));

        let effect = ctl.on_mouse_release();
        assert!(matches!(effect, WindowEffect::Committed(_)));
        assert_eq!(doc.listener_count(), 0);
        assert!(ctl.transient().is_zero());

        let commits = commits.borrow();
        assert_eq!(commits.len(), 1);
        let (name, patch) = &commits[0];
        assert_eq!(name, "slides");
        assert!(close(patch.left.unwrap(), 50.0));
        assert!(close(patch.top.unwrap(), 10.0 + 50.0 / 3.0));
        assert_eq!(patch.width, None);
    }

    #[test]
    fn drag_overshoot_commits_at_boundary() {
        let (mut ctl, commits, _doc) = default_controller();
        let stage = stage();
        ctl.press_handle(HandleId::Drag, 0.0, 0.0, &stage);
        ctl.on_cursor_moved(5_000.0, 20.0, &stage);
        ctl.on_mouse_release();
        let patch = commits.borrow()[0].1;
        assert!(close(patch.left.unwrap(), 80.0));
        assert!(ctl.geometry().satisfies_bounds());
    }

    #[test]
    fn single_click_commits_once() {
        let (mut ctl, commits, _doc) = default_controller();
        let stage = stage();
        ctl.press_handle(HandleId::Drag, 60.0, 35.0, &stage);
        ctl.on_mouse_release();
        let commits = commits.borrow();
        assert_eq!(commits.len(), 1);
        assert!(close(commits[0].1.left.unwrap(), 10.0));
        assert!(close(commits[0].1.top.unwrap(), 10.0));
    }

    #[test]
    fn escape_ends_drag_and_commits() {
        let (mut ctl, commits, doc) = default_controller();
        let stage = stage();
        ctl.press_handle(HandleId::Drag, 0.0, 0.0, &stage);
        ctl.on_cursor_moved(50.0, 0.0, &stage);
        let effect = ctl.on_key(NavKey::Escape, &stage);
        assert!(matches!(effect, WindowEffect::Committed(_)));
        assert_eq!(doc.listener_count(), 0);
        assert!(close(commits.borrow()[0].1.left.unwrap(), 20.0));
        assert_eq!(ctl.focused_handle(), None);
    }

    #[test]
    fn container_is_measured_at_every_session_start() {
        let (mut ctl, commits, _doc) = default_controller();
        let mut stage = stage();
        ctl.press_handle(HandleId::Drag, 0.0, 0.0, &stage);
        ctl.on_mouse_release();

        // Fullscreen: the container doubles in size between sessions.
        stage.set_boundary(SELECTOR, PixelSize::new(1000.0, 600.0));
        ctl.press_handle(HandleId::Drag, 0.0, 0.0, &stage);
        ctl.on_cursor_moved(100.0, 0.0, &stage);
        ctl.on_mouse_release();
        let patch = commits.borrow()[1].1;
        assert!(close(patch.left.unwrap(), 20.0));
    }

    #[test]
    fn missing_container_makes_window_immovable() {
        let (mut ctl, commits, doc) = default_controller();
        let stage = Stage::new();
        assert_eq!(ctl.press_handle(HandleId::Drag, 0.0, 0.0, &stage), WindowEffect::None);
        assert_eq!(ctl.on_cursor_moved(100.0, 100.0, &stage), WindowEffect::None);
        assert_eq!(ctl.on_mouse_release(), WindowEffect::None);
        assert!(commits.borrow().is_empty());
        assert_eq!(doc.listener_count(), 0);
        assert_eq!(ctl.on_key(NavKey::ArrowRight, &stage), WindowEffect::None);
    }

    #[test]
    fn measured_panel_rect_overrides_projection() {
        let (mut ctl, commits, _doc) = default_controller();
        let mut stage = stage();
        stage.set_panel_rect("slides", PixelRect::new(51.0, 30.0, 100.0, 60.0));
        ctl.press_handle(HandleId::Drag, 0.0, 0.0, &stage);
        ctl.on_mouse_release();
        assert!(close(commits.borrow()[0].1.left.unwrap(), 10.2));
    }

    // ── Hover and press ──────────────────────────────────────────────

    #[test]
    fn hover_sets_cursor_then_press_starts_resize() {
        let (mut ctl, _commits, _doc) = default_controller();
        let stage = stage();
        // Panel occupies x 50..150, y 30..90.
        let effect = ctl.on_cursor_moved(150.0, 60.0, &stage);
        assert_eq!(effect, WindowEffect::SetCursor(CursorType::EwResize));
        assert_eq!(ctl.on_cursor_moved(151.0, 61.0, &stage), WindowEffect::None);

        assert_eq!(ctl.on_mouse_press(&stage), WindowEffect::Redraw);
        assert_eq!(ctl.gesture(), Some(Gesture::Resize(ResizeEdge::Right)));
    }

    #[test]
    fn leaving_handle_resets_cursor() {
        let (mut ctl, _commits, _doc) = default_controller();
        let stage = stage();
        ctl.on_cursor_moved(100.0, 40.0, &stage);
        assert_eq!(ctl.hovered(), Some(HandleId::Drag));
        let effect = ctl.on_cursor_moved(400.0, 200.0, &stage);
        assert_eq!(effect, WindowEffect::SetCursor(CursorType::Default));
    }

    #[test]
    fn press_outside_handles_is_no_op() {
        let (mut ctl, _commits, doc) = default_controller();
        let stage = stage();
        ctl.on_cursor_moved(400.0, 200.0, &stage);
        assert_eq!(ctl.on_mouse_press(&stage), WindowEffect::None);
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn release_without_session_is_no_op() {
        let (mut ctl, commits, _doc) = default_controller();
        assert_eq!(ctl.on_mouse_release(), WindowEffect::None);
        assert!(commits.borrow().is_empty());
    }

    // ── Resize sessions ──────────────────────────────────────────────

    #[test]
    fn resize_right_commits_width_only() {
        let (mut ctl, commits, _doc) = default_controller();
        let stage = stage();
        ctl.press_handle(HandleId::Resize(ResizeEdge::Right), 150.0, 60.0, &stage);
        ctl.on_cursor_moved(200.0, 60.0, &stage);
        assert!(close(ctl.frame().style.width, 30.0));
        ctl.on_mouse_release();
        let patch = commits.borrow()[0].1;
        assert!(close(patch.width.unwrap(), 30.0));
        assert_eq!(patch.left, None);
        assert_eq!(patch.height, None);
    }

    #[test]
    fn resize_top_left_moves_origin_and_grows() {
        let (mut ctl, commits, _doc) = default_controller();
        let stage = stage();
        ctl.press_handle(HandleId::Resize(ResizeEdge::TopLeft), 50.0, 30.0, &stage);
        ctl.on_cursor_moved(25.0, 15.0, &stage);
        let style = ctl.frame().style;
        assert!(close(style.translate_x, -25.0));
        assert!(close(style.translate_y, -15.0));
        ctl.on_mouse_release();
        let g = ctl.geometry();
        assert!(close(g.left, 5.0));
        assert!(close(g.top, 5.0));
        assert!(close(g.width, 25.0));
        assert!(close(g.height, 25.0));
        assert_eq!(commits.borrow().len(), 1);
    }

    #[test]
    fn resize_overshoot_stops_at_container() {
        let (mut ctl, _commits, _doc) = default_controller();
        let stage = stage();
        ctl.press_handle(HandleId::Resize(ResizeEdge::BottomRight), 150.0, 90.0, &stage);
        ctl.on_cursor_moved(9_000.0, 9_000.0, &stage);
        ctl.on_mouse_release();
        let g = ctl.geometry();
        assert!(close(g.left + g.width, 100.0));
        assert!(close(g.top + g.height, 100.0));
        assert!(g.satisfies_bounds());
    }

    // ── Keyboard ─────────────────────────────────────────────────────

    #[test]
    fn arrow_keys_move_focused_window() {
        let (mut ctl, commits, _doc) = default_controller();
        let stage = stage();
        ctl.set_focus(Some(HandleId::Drag));
        let effect = ctl.on_key(NavKey::ArrowRight, &stage);
        assert!(matches!(effect, WindowEffect::Committed(_)));
        assert!(close(ctl.geometry().left, 12.0));
        ctl.on_key(NavKey::End, &stage);
        assert!(close(ctl.geometry().left, 80.0));
        assert!(close(ctl.geometry().top, 80.0));
        assert_eq!(commits.borrow().len(), 2);
    }

    #[test]
    fn key_without_focus_is_ignored() {
        let (mut ctl, commits, _doc) = default_controller();
        assert_eq!(ctl.on_key(NavKey::ArrowRight, &stage()), WindowEffect::None);
        assert!(commits.borrow().is_empty());
    }

    #[test]
    fn resize_key_on_focused_grip() {
        let (mut ctl, commits, _doc) = controller(WindowGeometry::new(10.0, 70.0, 20.0, 20.0));
        let stage = stage();
        ctl.set_focus(Some(HandleId::Resize(ResizeEdge::Right)));
        ctl.on_key(NavKey::ArrowRight, &stage);
        assert_eq!(ctl.geometry().width, 22.0);
        ctl.on_key(NavKey::ArrowRight, &stage);
        ctl.on_key(NavKey::ArrowRight, &stage);
        ctl.on_key(NavKey::ArrowRight, &stage);
        ctl.on_key(NavKey::ArrowRight, &stage);
        ctl.on_key(NavKey::ArrowRight, &stage);
        assert_eq!(ctl.geometry().width, 30.0);
        assert_eq!(commits.borrow().len(), 6);
    }

    #[test]
    fn off_axis_resize_key_does_not_commit() {
        let (mut ctl, commits, _doc) = default_controller();
        ctl.set_focus(Some(HandleId::Resize(ResizeEdge::Right)));
        assert_eq!(ctl.on_key(NavKey::ArrowUp, &stage()), WindowEffect::None);
        assert!(commits.borrow().is_empty());
    }

    #[test]
    fn discrete_keys_ignored_during_pointer_session() {
        let (mut ctl, commits, _doc) = default_controller();
        let stage = stage();
        ctl.press_handle(HandleId::Drag, 0.0, 0.0, &stage);
        assert_eq!(ctl.on_key(NavKey::ArrowRight, &stage), WindowEffect::None);
        assert!(commits.borrow().is_empty());
    }

    // ── Locking and sync ─────────────────────────────────────────────

    #[test]
    fn locked_window_ignores_gestures() {
        let (mut ctl, commits, doc) = default_controller();
        let stage = stage();
        ctl.set_locked(true);
        assert_eq!(ctl.press_handle(HandleId::Drag, 0.0, 0.0, &stage), WindowEffect::None);
        assert_eq!(ctl.on_cursor_moved(100.0, 40.0, &stage), WindowEffect::None);
        assert_eq!(doc.listener_count(), 0);
        ctl.set_focus(Some(HandleId::Drag));
        assert_eq!(ctl.on_key(NavKey::Home, &stage), WindowEffect::None);
        assert!(commits.borrow().is_empty());
    }

    #[test]
    fn press_during_session_ends_it_first() {
        let (mut ctl, commits, doc) = default_controller();
        let stage = stage();
        ctl.press_handle(HandleId::Drag, 60.0, 35.0, &stage);
        ctl.press_handle(HandleId::Resize(ResizeEdge::Right), 150.0, 60.0, &stage);
        assert_eq!(doc.listener_count(), 2);
        assert_eq!(ctl.gesture(), Some(Gesture::Resize(ResizeEdge::Right)));

        ctl.on_cursor_moved(200.0, 60.0, &stage);
        assert!(matches!(ctl.on_mouse_release(), WindowEffect::Committed(_)));
        assert_eq!(doc.listener_count(), 0);
        assert!(!ctl.is_interacting());

        let commits = commits.borrow();
        assert_eq!(commits.len(), 2);
        assert!(close(commits[0].1.left.unwrap(), 10.0));
        assert!(close(commits[1].1.width.unwrap(), 30.0));
        assert!(close(ctl.geometry().width, 30.0));
    }

    #[test]
    fn repress_of_same_handle_commits_previous_session() {
        let (mut ctl, commits, doc) = default_controller();
        let stage = stage();
        ctl.press_handle(HandleId::Drag, 0.0, 0.0, &stage);
        ctl.on_cursor_moved(50.0, 0.0, &stage);
        ctl.press_handle(HandleId::Drag, 100.0, 100.0, &stage);
        ctl.on_mouse_release();
        assert_eq!(doc.listener_count(), 0);
        let commits = commits.borrow();
        assert_eq!(commits.len(), 2);
        assert!(close(commits[0].1.left.unwrap(), 20.0));
        assert!(close(commits[1].1.left.unwrap(), 20.0));
    }

    #[test]
    fn locking_mid_session_discards_it() {
        let (mut ctl, commits, doc) = default_controller();
        let stage = stage();
        ctl.press_handle(HandleId::Resize(ResizeEdge::Bottom), 100.0, 90.0, &stage);
        ctl.on_cursor_moved(100.0, 150.0, &stage);
        ctl.set_locked(true);
        assert_eq!(doc.listener_count(), 0);
        assert!(!ctl.is_interacting());
        assert_eq!(ctl.on_mouse_release(), WindowEffect::None);
        assert!(commits.borrow().is_empty());
        assert_eq!(ctl.geometry(), WindowGeometry::new(10.0, 10.0, 20.0, 20.0));
    }

    #[test]
    fn sync_is_deferred_during_session() {
        let (mut ctl, _commits, _doc) = default_controller();
        ctl.press_handle(HandleId::Drag, 0.0, 0.0, &stage());
        ctl.sync_geometry(WindowGeometry::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(ctl.geometry(), WindowGeometry::new(10.0, 10.0, 20.0, 20.0));
        ctl.on_mouse_release();
        ctl.sync_geometry(WindowGeometry::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(ctl.geometry(), WindowGeometry::new(0.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn dropping_controller_mid_session_detaches_listeners() {
        let (mut ctl, _commits, doc) = default_controller();
        ctl.press_handle(HandleId::Resize(ResizeEdge::Top), 0.0, 0.0, &stage());
        assert_eq!(doc.listener_count(), 2);
        drop(ctl);
        assert_eq!(doc.listener_count(), 0);
    }

    // ── Rendering ────────────────────────────────────────────────────

    #[test]
    fn frame_reflects_session_state() {
        let (mut ctl, _commits, _doc) = default_controller();
        let stage = stage();
        ctl.press_handle(HandleId::Drag, 0.0, 0.0, &stage);
        ctl.on_cursor_moved(10.0, 5.0, &stage);
        let frame = ctl.frame();
        assert_eq!(frame.active_handle, Some(HandleId::Drag));
        assert_eq!(frame.focused_handle, Some(HandleId::Drag));
        assert_eq!(frame.cursor, CursorType::Grabbing);
        assert_eq!(frame.content, "slides (true)");
        assert_eq!(
            frame.style.to_css(),
            "height: 20%; left: 10%; top: 10%; transform: translate3d(10px, 5px, 0); width: 20%"
        );
    }

    #[test]
    fn frame_when_idle() {
        let (ctl, _commits, _doc) = default_controller();
        let frame = ctl.frame();
        assert_eq!(frame.active_handle, None);
        assert_eq!(frame.cursor, CursorType::Default);
        assert_eq!(frame.content, "slides (false)");
    }

    // ── Properties ───────────────────────────────────────────────────

    #[derive(Debug, Clone)]
    enum Op {
        Drag(HandleId, f64, f64),
        Key(HandleId, NavKey),
    }

    fn handle_strategy() -> impl Strategy<Value = HandleId> {
        prop_oneof![
            Just(HandleId::Drag),
            proptest::sample::select(ResizeEdge::ALL.to_vec()).prop_map(HandleId::Resize),
        ]
    }

    fn key_strategy() -> impl Strategy<Value = NavKey> {
        proptest::sample::select(vec![
            NavKey::ArrowUp,
            NavKey::ArrowDown,
            NavKey::ArrowLeft,
            NavKey::ArrowRight,
            NavKey::Home,
            NavKey::End,
        ])
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (handle_strategy(), -2_000.0f64..2_000.0, -2_000.0f64..2_000.0)
                .prop_map(|(h, dx, dy)| Op::Drag(h, dx, dy)),
            (handle_strategy(), key_strategy()).prop_map(|(h, k)| Op::Key(h, k)),
        ]
    }

    proptest! {
        #[test]
        fn commits_always_stay_inside_container(ops in proptest::collection::vec(op_strategy(), 1..30)) {
            let (mut ctl, _commits, doc) = default_controller();
            let stage = stage();
            for op in ops {
                match op {
                    Op::Drag(handle, dx, dy) => {
                        ctl.press_handle(handle, 250.0, 150.0, &stage);
                        ctl.on_cursor_moved(250.0 + dx, 150.0 + dy, &stage);
                        ctl.on_mouse_release();
                    }
                    Op::Key(handle, key) => {
                        ctl.set_focus(Some(handle));
                        ctl.on_key(key, &stage);
                    }
                }
                prop_assert!(ctl.geometry().satisfies_bounds(), "{:?}", ctl.geometry());
                prop_assert_eq!(doc.listener_count(), 0);
            }
        }
    }
}
