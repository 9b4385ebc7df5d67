// Drag handle: turns press/move/release and navigation keys into raw move signals.

use crate::input::document::{Document, ListenerGuard, ListenerOwner};
use crate::input::{CursorType, NavKey};

use super::hit_test::HandleId;

/// Raw interaction reported by a handle. Carries no geometry knowledge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandleSignal {
    /// A pointer session began.
    Start,
    /// Pointer moved; offsets are pixels from the press position.
    Update { dx: f64, dy: f64 },
    /// The session ended (pointer released or cancel key).
    End,
    /// A discrete navigation key was pressed while focused.
    Key(NavKey),
}

/// Phase of a single grip.
#[derive(Debug, Clone, Copy, PartialEq)]
enum GripPhase {
    Idle,
    /// Pointer held since it was pressed at `base`.
    Active { base: (f64, f64) },
}

/// Focusable press-and-drag control shared by the drag bar and the resize grips.
///
/// While active it holds document-level pointer listeners; they are released
/// through [`Grip::finish`] or when the grip is dropped.
#[derive(Debug)]
pub struct Grip {
    owner: ListenerOwner,
    phase: GripPhase,
    listeners: Option<ListenerGuard>,
    focused: bool,
}

impl Grip {
    pub fn new(owner: ListenerOwner) -> Self {
        Self {
            owner,
            phase: GripPhase::Idle,
            listeners: None,
            focused: false,
        }
    }

    pub fn owner(&self) -> &ListenerOwner {
        &self.owner
    }

    /// Whether a pointer session is in progress (rendered as the "active" state).
    pub fn is_active(&self) -> bool {
        matches!(self.phase, GripPhase::Active { .. })
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Pointer pressed on the grip: take focus, remember the origin, and listen
    /// for document-level move/release.
    pub fn press(&mut self, x: f64, y: f64, document: &Document) -> HandleSignal {
        // Replacing the guard detaches a stale subscription before attaching the new one.
        self.listeners = None;
        self.focused = true;
        self.phase = GripPhase::Active { base: (x, y) };
        self.listeners = Some(document.attach(self.owner.clone()));
        HandleSignal::Start
    }

    /// Pointer moved anywhere in the document.
    pub fn move_to(&self, x: f64, y: f64) -> Option<HandleSignal> {
        match self.phase {
            GripPhase::Active { base } => Some(HandleSignal::Update {
                dx: x - base.0,
                dy: y - base.1,
            }),
            GripPhase::Idle => None,
        }
    }

    /// Pointer released anywhere in the document.
    pub fn release(&mut self) -> Option<HandleSignal> {
        if !self.is_active() {
            return None;
        }
        self.blur();
        Some(self.finish())
    }

    /// Key pressed while the grip has focus.
    pub fn key_down(&mut self, key: NavKey) -> Option<HandleSignal> {
        if key == NavKey::Escape {
            self.blur();
            return self.is_active().then(|| self.finish());
        }
        Some(HandleSignal::Key(key))
    }

    /// Single exit path of a session: detach listeners and clear the active state.
    fn finish(&mut self) -> HandleSignal {
        self.listeners = None;
        self.phase = GripPhase::Idle;
        HandleSignal::End
    }
}

/// The move bar of a window.
#[derive(Debug)]
pub struct DragHandle {
    grip: Grip,
}

impl DragHandle {
    pub fn new(window: &str) -> Self {
        Self {
            grip: Grip::new(ListenerOwner::new(window, HandleId::Drag)),
        }
    }

    pub fn grip(&self) -> &Grip {
        &self.grip
    }

    pub fn is_dragging(&self) -> bool {
        self.grip.is_active()
    }

    pub fn is_focused(&self) -> bool {
        self.grip.is_focused()
    }

    pub fn set_focused(&mut self, focused: bool) {
        if focused {
            self.grip.focus();
        } else {
            self.grip.blur();
        }
    }

    pub fn cursor(&self) -> CursorType {
        if self.is_dragging() {
            CursorType::Grabbing
        } else {
            CursorType::Grab
        }
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, document: &Document) -> HandleSignal {
        self.grip.press(x, y, document)
    }

    pub fn pointer_move(&self, x: f64, y: f64) -> Option<HandleSignal> {
        self.grip.move_to(x, y)
    }

    pub fn pointer_up(&mut self) -> Option<HandleSignal> {
        self.grip.release()
    }

    pub fn key_down(&mut self, key: NavKey) -> Option<HandleSignal> {
        self.grip.key_down(key)
    }
}
