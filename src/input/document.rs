// Document-level pointer listeners, attached for the lifetime of a gesture session.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::window::hit_test::HandleId;

/// Kinds of document-level events a session subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerKind {
    PointerMove,
    PointerUp,
}

/// The handle (of a named window) a listener belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerOwner {
    pub window: String,
    pub handle: HandleId,
}

impl ListenerOwner {
    pub fn new(window: impl Into<String>, handle: HandleId) -> Self {
        Self {
            window: window.into(),
            handle,
        }
    }
}

#[derive(Debug)]
struct Listener {
    guard_id: u64,
    kind: ListenerKind,
    owner: ListenerOwner,
}

#[derive(Debug, Default)]
struct Registry {
    next_guard_id: u64,
    listeners: Vec<Listener>,
}

/// Registry of document-level pointer listeners shared by every window on a surface.
///
/// Single-threaded: clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct Document {
    registry: Rc<RefCell<Registry>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `owner` to pointer-move and pointer-up.
    ///
    /// The listeners stay attached exactly as long as the returned guard lives.
    pub fn attach(&self, owner: ListenerOwner) -> ListenerGuard {
        let mut registry = self.registry.borrow_mut();
        let guard_id = registry.next_guard_id;
        registry.next_guard_id += 1;
        for kind in [ListenerKind::PointerMove, ListenerKind::PointerUp] {
            registry.listeners.push(Listener {
                guard_id,
                kind,
                owner: owner.clone(),
            });
        }
        log::trace!("attached document listeners for {}/{}", owner.window, owner.handle);
        ListenerGuard {
            guard_id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Total number of attached listeners across all windows.
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    /// Whether `owner` currently receives events of `kind`.
    pub fn is_listening(&self, owner: &ListenerOwner, kind: ListenerKind) -> bool {
        self.registry
            .borrow()
            .listeners
            .iter()
            .any(|l| l.kind == kind && &l.owner == owner)
    }

    /// Owners subscribed to `kind`, in attach order.
    pub fn owners(&self, kind: ListenerKind) -> Vec<ListenerOwner> {
        self.registry
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.owner.clone())
            .collect()
    }
}

/// Detaches its listeners when dropped.
#[derive(Debug)]
pub struct ListenerGuard {
    guard_id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .listeners
                .retain(|l| l.guard_id != self.guard_id);
        }
    }
}
