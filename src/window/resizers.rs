// Resize grips: eight edge/corner handles, each tagged with the directions it resizes.

use crate::input::document::{Document, ListenerOwner};
use crate::input::{CursorType, NavKey};

use super::drag_handle::{Grip, HandleSignal};
use super::hit_test::HandleId;
use super::model::Direction;

/// Position of a resize grip on the window border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeEdge {
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
}

impl ResizeEdge {
    /// All grips, clockwise from the top edge.
    pub const ALL: [ResizeEdge; 8] = [
        ResizeEdge::Top,
        ResizeEdge::TopRight,
        ResizeEdge::Right,
        ResizeEdge::BottomRight,
        ResizeEdge::Bottom,
        ResizeEdge::BottomLeft,
        ResizeEdge::Left,
        ResizeEdge::TopLeft,
    ];

    /// Directions resolved for this grip, in merge order.
    ///
    /// Corners list the vertical direction first; each direction is resolved on
    /// its own and the partial results are merged key by key, last write wins.
    pub fn directions(self) -> &'static [Direction] {
        match self {
            ResizeEdge::Top => &[Direction::Top],
            ResizeEdge::TopRight => &[Direction::Top, Direction::Right],
            ResizeEdge::Right => &[Direction::Right],
            ResizeEdge::BottomRight => &[Direction::Bottom, Direction::Right],
            ResizeEdge::Bottom => &[Direction::Bottom],
            ResizeEdge::BottomLeft => &[Direction::Bottom, Direction::Left],
            ResizeEdge::Left => &[Direction::Left],
            ResizeEdge::TopLeft => &[Direction::Top, Direction::Left],
        }
    }

    pub fn is_corner(self) -> bool {
        self.directions().len() == 2
    }

    pub fn cursor(self) -> CursorType {
        match self {
            ResizeEdge::Top | ResizeEdge::Bottom => CursorType::NsResize,
            ResizeEdge::Left | ResizeEdge::Right => CursorType::EwResize,
            ResizeEdge::TopLeft | ResizeEdge::BottomRight => CursorType::NwseResize,
            ResizeEdge::TopRight | ResizeEdge::BottomLeft => CursorType::NeswResize,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ResizeEdge::Top => "top",
            ResizeEdge::TopRight => "top-right",
            ResizeEdge::Right => "right",
            ResizeEdge::BottomRight => "bottom-right",
            ResizeEdge::Bottom => "bottom",
            ResizeEdge::BottomLeft => "bottom-left",
            ResizeEdge::Left => "left",
            ResizeEdge::TopLeft => "top-left",
        }
    }

    fn index(self) -> usize {
        match self {
            ResizeEdge::Top => 0,
            ResizeEdge::TopRight => 1,
            ResizeEdge::Right => 2,
            ResizeEdge::BottomRight => 3,
            ResizeEdge::Bottom => 4,
            ResizeEdge::BottomLeft => 5,
            ResizeEdge::Left => 6,
            ResizeEdge::TopLeft => 7,
        }
    }
}

/// A grip's signal together with the directions it applies to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSignal {
    pub edge: ResizeEdge,
    pub signal: HandleSignal,
}

impl ResizeSignal {
    pub fn directions(&self) -> &'static [Direction] {
        self.edge.directions()
    }
}

/// The eight resize grips of one window.
#[derive(Debug)]
pub struct Resizers {
    grips: [Grip; 8],
}

impl Resizers {
    pub fn new(window: &str) -> Self {
        Self {
            grips: ResizeEdge::ALL
                .map(|edge| Grip::new(ListenerOwner::new(window, HandleId::Resize(edge)))),
        }
    }

    pub fn grip(&self, edge: ResizeEdge) -> &Grip {
        &self.grips[edge.index()]
    }

    fn grip_mut(&mut self, edge: ResizeEdge) -> &mut Grip {
        &mut self.grips[edge.index()]
    }

    /// The grip currently holding a pointer session, if any.
    pub fn active_edge(&self) -> Option<ResizeEdge> {
        ResizeEdge::ALL
            .into_iter()
            .find(|edge| self.grip(*edge).is_active())
    }

    /// The grip that has keyboard focus, if any.
    pub fn focused_edge(&self) -> Option<ResizeEdge> {
        ResizeEdge::ALL
            .into_iter()
            .find(|edge| self.grip(*edge).is_focused())
    }

    /// Move keyboard focus to `edge`, or clear it.
    pub fn set_focus(&mut self, edge: Option<ResizeEdge>) {
        for grip in &mut self.grips {
            grip.blur();
        }
        if let Some(edge) = edge {
            self.grip_mut(edge).focus();
        }
    }

    pub fn pointer_down(&mut self, edge: ResizeEdge, x: f64, y: f64, document: &Document) -> ResizeSignal {
        self.set_focus(None);
        let signal = self.grip_mut(edge).press(x, y, document);
        ResizeSignal { edge, signal }
    }

    pub fn pointer_move(&self, edge: ResizeEdge, x: f64, y: f64) -> Option<ResizeSignal> {
        self.grip(edge)
            .move_to(x, y)
            .map(|signal| ResizeSignal { edge, signal })
    }

    pub fn pointer_up(&mut self, edge: ResizeEdge) -> Option<ResizeSignal> {
        self.grip_mut(edge)
            .release()
            .map(|signal| ResizeSignal { edge, signal })
    }

    pub fn key_down(&mut self, edge: ResizeEdge, key: NavKey) -> Option<ResizeSignal> {
        self.grip_mut(edge)
            .key_down(key)
            .map(|signal| ResizeSignal { edge, signal })
    }
}
