// Overlay: several floating windows sharing one document, stage, and store.

use crate::config::types::Config;
use crate::input::document::{Document, ListenerKind};
use crate::input::NavKey;
use crate::stage::Stage;
use crate::window::hit_test::HandleId;
use crate::window::store::{Commit, CommitQueue, WindowStore};
use crate::window::{
    WindowBehavior, WindowContent, WindowController, WindowEffect, WindowFrame, WindowProps,
};

/// Returned when a window name is not in the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown window '{0}'")]
pub struct UnknownWindow(pub String);

/// Host-facing entry point: routes input to the right window and keeps the
/// store in step with every commit.
///
/// Windows are stacked in the order they were opened; the last one is on top.
pub struct Overlay<C: WindowContent> {
    document: Document,
    stage: Stage,
    store: WindowStore,
    queue: CommitQueue,
    windows: Vec<WindowController<C, CommitQueue>>,
    behavior: WindowBehavior,
    boundary_selector: String,
    applied: Vec<Commit>,
}

impl<C: WindowContent> Overlay<C> {
    pub fn new(config: &Config, stage: Stage) -> Self {
        Self {
            document: Document::new(),
            stage,
            store: WindowStore::new(config.windows.clone()),
            queue: CommitQueue::new(),
            windows: Vec::new(),
            behavior: config.behavior(),
            boundary_selector: config.boundary.selector.clone(),
            applied: Vec::new(),
        }
    }

    /// Mount a controller for a stored window. Reopening replaces the old one.
    pub fn open(&mut self, name: &str, content: C) -> Result<(), UnknownWindow> {
        let entry = self
            .store
            .get(name)
            .ok_or_else(|| UnknownWindow(name.to_string()))?;
        let props = WindowProps {
            window_name: entry.name.clone(),
            geometry: entry.geometry,
            boundary_selector: self.boundary_selector.clone(),
            locked: entry.locked,
        };
        self.close(name);
        log::debug!("Opening window '{name}'");
        self.windows.push(WindowController::new(
            props,
            self.behavior,
            content,
            self.queue.clone(),
            self.document.clone(),
        ));
        Ok(())
    }

    /// Unmount a window. Any session it holds is dropped without committing.
    pub fn close(&mut self, name: &str) -> bool {
        let before = self.windows.len();
        self.windows.retain(|w| w.name() != name);
        before != self.windows.len()
    }

    /// Selector every window measures its container by.
    pub fn boundary_selector(&self) -> &str {
        &self.boundary_selector
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Layout access for hosts reporting container resizes.
    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn store(&self) -> &WindowStore {
        &self.store
    }

    pub fn window(&self, name: &str) -> Option<&WindowController<C, CommitQueue>> {
        self.windows.iter().find(|w| w.name() == name)
    }

    fn index_of(&self, name: &str) -> Result<usize, UnknownWindow> {
        self.windows
            .iter()
            .position(|w| w.name() == name)
            .ok_or_else(|| UnknownWindow(name.to_string()))
    }

    fn is_visible(&self, name: &str) -> bool {
        self.store.get(name).is_some_and(|e| e.visible)
    }

    /// Window whose handle holds document listeners of `kind`.
    fn listening_window(&self, kind: ListenerKind) -> Option<usize> {
        let owner = self.document.owners(kind).into_iter().next()?;
        self.windows.iter().position(|w| w.name() == owner.window)
    }

    // ── Pointer input ────────────────────────────────────────────────

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> WindowEffect {
        if let Some(i) = self.listening_window(ListenerKind::PointerMove) {
            return self.windows[i].on_cursor_moved(x, y, &self.stage);
        }

        let target = self
            .windows
            .iter()
            .rposition(|w| self.is_visible(w.name()) && w.hit_test(x, y, &self.stage).is_some());

        let mut effect = WindowEffect::None;
        for (i, window) in self.windows.iter_mut().enumerate() {
            if Some(i) == target {
                let hovered = window.on_cursor_moved(x, y, &self.stage);
                if hovered != WindowEffect::None {
                    effect = hovered;
                }
            } else {
                let left = window.clear_hover();
                if target.is_none() && left != WindowEffect::None {
                    effect = left;
                }
            }
        }
        effect
    }

    /// Press on whatever handle is hovered. Focus moves to the pressed window.
    pub fn on_mouse_press(&mut self) -> WindowEffect {
        if self.listening_window(ListenerKind::PointerUp).is_some() {
            return WindowEffect::None;
        }
        let Some(i) = self.windows.iter().rposition(|w| w.hovered().is_some()) else {
            return WindowEffect::None;
        };
        self.blur_except(i);
        let effect = self.windows[i].on_mouse_press(&self.stage);
        self.flush();
        effect
    }

    pub fn on_mouse_release(&mut self) -> WindowEffect {
        let Some(i) = self.listening_window(ListenerKind::PointerUp) else {
            return WindowEffect::None;
        };
        let effect = self.windows[i].on_mouse_release();
        self.flush();
        effect
    }

    /// Press a named handle directly, bypassing hover hit-testing.
    pub fn press_handle(&mut self, name: &str, handle: HandleId, x: f64, y: f64) -> Result<WindowEffect, UnknownWindow> {
        let i = self.index_of(name)?;
        if self.listening_window(ListenerKind::PointerUp).is_some() {
            return Ok(WindowEffect::None);
        }
        self.blur_except(i);
        let effect = self.windows[i].press_handle(handle, x, y, &self.stage);
        self.flush();
        Ok(effect)
    }

    // ── Keyboard input ───────────────────────────────────────────────

    /// Deliver a key to the window whose handle has focus.
    pub fn on_key(&mut self, key: NavKey) -> WindowEffect {
        let Some(i) = self
            .windows
            .iter()
            .position(|w| w.focused_handle().is_some())
        else {
            return WindowEffect::None;
        };
        let effect = self.windows[i].on_key(key, &self.stage);
        self.flush();
        effect
    }

    /// Focus a handle of one window (or clear its focus); every other window blurs.
    pub fn focus(&mut self, name: &str, handle: Option<HandleId>) -> Result<(), UnknownWindow> {
        let i = self.index_of(name)?;
        self.blur_except(i);
        self.windows[i].set_focus(handle);
        Ok(())
    }

    fn blur_except(&mut self, keep: usize) {
        for (i, window) in self.windows.iter_mut().enumerate() {
            if i != keep {
                window.set_focus(None);
            }
        }
    }

    // ── Window state ─────────────────────────────────────────────────

    /// Lock or unlock every window. Running sessions are discarded uncommitted.
    pub fn set_locked_all(&mut self, locked: bool) {
        self.store.set_locked_all(locked);
        for window in &mut self.windows {
            window.set_locked(locked);
        }
    }

    /// Show or hide a window. Hiding discards its running session uncommitted.
    pub fn set_visible(&mut self, name: &str, visible: bool) -> Result<(), UnknownWindow> {
        if !self.store.set_visible(name, visible) {
            return Err(UnknownWindow(name.to_string()));
        }
        if !visible {
            if let Ok(i) = self.index_of(name) {
                self.windows[i].cancel_session();
                self.windows[i].clear_hover();
                self.windows[i].set_focus(None);
            }
        }
        Ok(())
    }

    /// Move queued commits into the store and sync controllers from it.
    fn flush(&mut self) {
        let commits = self.queue.drain();
        if commits.is_empty() {
            return;
        }
        for commit in &commits {
            self.store.apply(&commit.window, &commit.patch);
        }
        for window in &mut self.windows {
            if let Some(entry) = self.store.get(window.name()) {
                window.sync_geometry(entry.geometry);
            }
        }
        self.applied.extend(commits);
    }

    /// Commits applied to the store since the last call, oldest first.
    pub fn drain_applied(&mut self) -> Vec<Commit> {
        std::mem::take(&mut self.applied)
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Frames of visible windows, bottom to top.
    pub fn frames(&self) -> Vec<WindowFrame<C::Output>> {
        self.windows
            .iter()
            .filter(|w| self.is_visible(w.name()))
            .map(WindowController::frame)
            .collect()
    }
}
