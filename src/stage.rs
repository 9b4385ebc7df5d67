// Layout probing: where hosts report boundary container sizes and rendered panel rects.

use std::collections::HashMap;

use crate::geometry::{PixelRect, PixelSize};

/// Read-only measurements the window controller needs from the host's layout.
pub trait LayoutProbe {
    /// Pixel size of the container matching `selector`, or `None` if nothing matches.
    fn boundary_size(&self, selector: &str) -> Option<PixelSize>;

    /// Rendered rect of a window's panel relative to its container.
    ///
    /// Hosts that cannot measure return `None`; the controller then projects
    /// committed geometry onto the container instead.
    fn panel_rect(&self, _window_name: &str) -> Option<PixelRect> {
        None
    }
}

impl<T: LayoutProbe + ?Sized> LayoutProbe for &T {
    fn boundary_size(&self, selector: &str) -> Option<PixelSize> {
        (**self).boundary_size(selector)
    }

    fn panel_rect(&self, window_name: &str) -> Option<PixelRect> {
        (**self).panel_rect(window_name)
    }
}

/// In-memory layout: named boundary containers plus optional measured panel rects.
#[derive(Debug, Clone, Default)]
pub struct Stage {
    boundaries: HashMap<String, PixelSize>,
    panels: HashMap<String, PixelRect>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or resize a boundary container (e.g. after a fullscreen toggle).
    pub fn set_boundary(&mut self, selector: impl Into<String>, size: PixelSize) {
        self.boundaries.insert(selector.into(), size);
    }

    pub fn remove_boundary(&mut self, selector: &str) {
        self.boundaries.remove(selector);
    }

    /// Record the measured rect of a panel, overriding projection.
    pub fn set_panel_rect(&mut self, window_name: impl Into<String>, rect: PixelRect) {
        self.panels.insert(window_name.into(), rect);
    }

    pub fn clear_panel_rect(&mut self, window_name: &str) {
        self.panels.remove(window_name);
    }
}

impl LayoutProbe for Stage {
    fn boundary_size(&self, selector: &str) -> Option<PixelSize> {
        self.boundaries.get(selector).copied()
    }

    fn panel_rect(&self, window_name: &str) -> Option<PixelRect> {
        self.panels.get(window_name).copied()
    }
}
