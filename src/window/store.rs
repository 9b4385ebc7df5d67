// Window store: merges committed patches into named window entries.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::model::{GeometryPatch, WindowGeometry};
use super::GeometrySink;

/// Persistent state of one named window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowEntry {
    pub name: String,
    #[serde(flatten)]
    pub geometry: WindowGeometry,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl WindowEntry {
    pub fn new(name: impl Into<String>, geometry: WindowGeometry) -> Self {
        Self {
            name: name.into(),
            geometry,
            locked: false,
            visible: true,
        }
    }
}

/// Named window entries, in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowStore {
    entries: Vec<WindowEntry>,
}

impl WindowStore {
    pub fn new(entries: Vec<WindowEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[WindowEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&WindowEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut WindowEntry> {
        self.entries.iter_mut().find(|e| e.name == name)
    }

    /// Merge `patch` into the named window. Returns false for unknown names.
    pub fn apply(&mut self, name: &str, patch: &GeometryPatch) -> bool {
        match self.get_mut(name) {
            Some(entry) => {
                entry.geometry = patch.apply_to(&entry.geometry);
                true
            }
            None => {
                log::warn!("Dropping geometry for unknown window '{name}'");
                false
            }
        }
    }

    /// Lock or unlock every window at once.
    pub fn set_locked_all(&mut self, locked: bool) {
        for entry in &mut self.entries {
            entry.locked = locked;
        }
    }

    /// Show or hide one window. Returns false for unknown names.
    pub fn set_visible(&mut self, name: &str, visible: bool) -> bool {
        match self.get_mut(name) {
            Some(entry) => {
                entry.visible = visible;
                true
            }
            None => false,
        }
    }
}

impl GeometrySink for WindowStore {
    fn commit(&mut self, window_name: &str, patch: GeometryPatch) {
        self.apply(window_name, &patch);
    }
}

/// One committed interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Commit {
    pub window: String,
    #[serde(flatten)]
    pub patch: GeometryPatch,
}

/// Sink that queues commits for a host to drain after each event.
#[derive(Debug, Clone, Default)]
pub struct CommitQueue {
    pending: Rc<RefCell<Vec<Commit>>>,
}

impl CommitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued commit, oldest first.
    pub fn drain(&self) -> Vec<Commit> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

impl GeometrySink for CommitQueue {
    fn commit(&mut self, window_name: &str, patch: GeometryPatch) {
        self.pending.borrow_mut().push(Commit {
            window: window_name.to_string(),
            patch,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> WindowStore {
        WindowStore::new(vec![
            WindowEntry::new("slides", WindowGeometry::new(10.0, 10.0, 20.0, 20.0)),
            WindowEntry::new("captions", WindowGeometry::new(70.0, 10.0, 80.0, 20.0)),
        ])
    }

    #[test]
    fn apply_merges_only_set_fields() {
        let mut store = store();
        let patch = GeometryPatch {
            left: Some(30.0),
            ..Default::default()
        };
        assert!(store.apply("slides", &patch));
        assert_eq!(
            store.get("slides").unwrap().geometry,
            WindowGeometry::new(10.0, 30.0, 20.0, 20.0)
        );
        assert_eq!(
            store.get("captions").unwrap().geometry,
            WindowGeometry::new(70.0, 10.0, 80.0, 20.0)
        );
    }

    #[test]
    fn apply_to_unknown_window_is_rejected() {
        let mut store = store();
        assert!(!store.apply("chapters", &GeometryPatch::default()));
    }

    #[test]
    fn lock_all_and_visibility() {
        let mut store = store();
        store.set_locked_all(true);
        assert!(store.entries().iter().all(|e| e.locked));
        assert!(store.set_visible("captions", false));
        assert!(!store.get("captions").unwrap().visible);
        assert!(!store.set_visible("chapters", false));
    }

    #[test]
    fn store_is_a_sink() {
        let mut store = store();
        store.commit(
            "slides",
            GeometryPatch {
                width: Some(40.0),
                ..Default::default()
            },
        );
        assert_eq!(store.get("slides").unwrap().geometry.width, 40.0);
    }

    #[test]
    fn queue_drains_in_order() {
        let mut queue = CommitQueue::new();
        let reader = queue.clone();
        queue.commit("a", GeometryPatch::default());
        queue.commit("b", GeometryPatch::default());
        assert_eq!(reader.len(), 2);
        let drained = reader.drain();
        assert_eq!(drained[0].window, "a");
        assert_eq!(drained[1].window, "b");
        assert!(queue.is_empty());
    }

    #[test]
    fn commit_serializes_flat() {
        let commit = Commit {
            window: "slides".to_string(),
            patch: GeometryPatch {
                top: Some(5.0),
                ..Default::default()
            },
        };
        assert_eq!(
            serde_json::to_string(&commit).unwrap(),
            r#"{"window":"slides","top":5.0}"#
        );
    }

    #[test]
    fn entry_deserializes_with_defaults() {
        let entry: WindowEntry =
            serde_json::from_str(r#"{"name":"slides","top":1,"left":2,"width":3,"height":4}"#).unwrap();
        assert!(!entry.locked);
        assert!(entry.visible);
        assert_eq!(entry.geometry, WindowGeometry::new(1.0, 2.0, 3.0, 4.0));
    }
}
