// Gesture resolution: raw handle deltas and keys into clamped geometry changes.
//
// Pointer gestures produce transient deltas relative to the panel's rendered
// rect at session start; keyboard gestures produce committed patches directly.

use crate::geometry::{bounded, percentage_to_unit, unit_to_percent, PixelRect, PixelSize};
use crate::input::NavKey;

use super::model::{DeltaPatch, Direction, GeometryPatch, TransientDelta, WindowGeometry};

/// Everything a pointer session resolves against, captured at session start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionBasis {
    /// Committed geometry when the session began.
    pub committed: WindowGeometry,
    /// Boundary container size, measured once per session.
    pub container: PixelSize,
    /// Rendered pixel rect of the panel, measured once per session.
    pub origin: PixelRect,
    /// Smallest width/height a resize may leave, in percent.
    pub min_size: f64,
}

impl SessionBasis {
    fn origin_left_pct(&self) -> f64 {
        unit_to_percent(self.origin.x, self.container.width)
    }

    fn origin_top_pct(&self) -> f64 {
        unit_to_percent(self.origin.y, self.container.height)
    }
}

/// Clamp a translation so `[offset, offset + size]` stays inside `[0, container]`.
pub fn safe_translate(delta: f64, offset: f64, size: f64, container: f64) -> f64 {
    if offset + delta < 0.0 {
        -offset
    } else if offset + size + delta > container {
        container - offset - size
    } else {
        delta
    }
}

/// Allowed range for a percentage delta; always admits zero.
fn clamp_span(delta: f64, lo: f64, hi: f64) -> f64 {
    bounded(delta, lo.min(0.0), hi.max(0.0))
}

/// Pixel translation for a drag by `(dx, dy)`.
pub fn resolve_drag(dx: f64, dy: f64, basis: &SessionBasis) -> DeltaPatch {
    let o = basis.origin;
    DeltaPatch {
        left_diff: Some(safe_translate(dx, o.x, o.width, basis.container.width)),
        top_diff: Some(safe_translate(dy, o.y, o.height, basis.container.height)),
        ..Default::default()
    }
}

/// Final drag position: rendered offset plus translation, as percentages.
pub fn drag_commit(transient: &TransientDelta, basis: &SessionBasis) -> GeometryPatch {
    GeometryPatch {
        left: Some(unit_to_percent(
            basis.origin.x + transient.left_diff,
            basis.container.width,
        )),
        top: Some(unit_to_percent(
            basis.origin.y + transient.top_diff,
            basis.container.height,
        )),
        ..Default::default()
    }
}

/// Resolve a pointer resize along one direction.
///
/// The moving edge stops exactly at the container boundary, and never closer
/// than `min_size` to the opposite edge.
pub fn resolve_resize(direction: Direction, dx: f64, dy: f64, basis: &SessionBasis) -> DeltaPatch {
    let g = basis.committed;
    let c = basis.container;
    match direction {
        Direction::Top => {
            let top = basis.origin_top_pct();
            let diff = clamp_span(unit_to_percent(dy, c.height), -top, g.height - basis.min_size);
            DeltaPatch {
                top_diff: Some(percentage_to_unit(diff, c.height)),
                height_diff: Some(-diff),
                ..Default::default()
            }
        }
        Direction::Bottom => {
            let top = basis.origin_top_pct();
            let diff = clamp_span(
                unit_to_percent(dy, c.height),
                basis.min_size - g.height,
                100.0 - top - g.height,
            );
            DeltaPatch {
                height_diff: Some(diff),
                ..Default::default()
            }
        }
        Direction::Left => {
            let left = basis.origin_left_pct();
            let diff = clamp_span(unit_to_percent(dx, c.width), -left, g.width - basis.min_size);
            DeltaPatch {
                left_diff: Some(percentage_to_unit(diff, c.width)),
                width_diff: Some(-diff),
                ..Default::default()
            }
        }
        Direction::Right => {
            let left = basis.origin_left_pct();
            let diff = clamp_span(
                unit_to_percent(dx, c.width),
                basis.min_size - g.width,
                100.0 - left - g.width,
            );
            DeltaPatch {
                width_diff: Some(diff),
                ..Default::default()
            }
        }
    }
}

/// Resolve every direction of a grip and merge the partial results in order.
pub fn resolve_resize_all(directions: &[Direction], dx: f64, dy: f64, basis: &SessionBasis) -> DeltaPatch {
    directions
        .iter()
        .map(|d| resolve_resize(*d, dx, dy, basis))
        .fold(DeltaPatch::default(), DeltaPatch::merge)
}

/// Fields a resize along `directions` may change, valued from the transient delta.
pub fn resize_commit(directions: &[Direction], transient: &TransientDelta, basis: &SessionBasis) -> GeometryPatch {
    let g = basis.committed;
    let c = basis.container;
    directions
        .iter()
        .map(|direction| match direction {
            Direction::Top => GeometryPatch {
                top: Some(g.top + unit_to_percent(transient.top_diff, c.height)),
                height: Some(g.height + transient.height_diff),
                ..Default::default()
            },
            Direction::Bottom => GeometryPatch {
                height: Some(g.height + transient.height_diff),
                ..Default::default()
            },
            Direction::Left => GeometryPatch {
                left: Some(g.left + unit_to_percent(transient.left_diff, c.width)),
                width: Some(g.width + transient.width_diff),
                ..Default::default()
            },
            Direction::Right => GeometryPatch {
                width: Some(g.width + transient.width_diff),
                ..Default::default()
            },
        })
        .fold(GeometryPatch::default(), GeometryPatch::merge)
}

/// Move a window by one keyboard step, keeping it fully inside the container.
///
/// `size` is the rendered width/height in percent. Home and End jump to the
/// minimum and maximum position on both axes. Escape yields an empty patch.
pub fn move_by_key(key: NavKey, committed: &WindowGeometry, size: (f64, f64), step: f64) -> GeometryPatch {
    let (width, height) = size;
    let left = |pct: f64| Some(bounded(pct, 0.0, 100.0 - width));
    let top = |pct: f64| Some(bounded(pct, 0.0, 100.0 - height));
    match key {
        NavKey::ArrowRight => GeometryPatch {
            left: left(committed.left + step),
            ..Default::default()
        },
        NavKey::ArrowLeft => GeometryPatch {
            left: left(committed.left - step),
            ..Default::default()
        },
        NavKey::ArrowUp => GeometryPatch {
            top: top(committed.top - step),
            ..Default::default()
        },
        NavKey::ArrowDown => GeometryPatch {
            top: top(committed.top + step),
            ..Default::default()
        },
        NavKey::Home => GeometryPatch {
            left: left(0.0),
            top: top(0.0),
            ..Default::default()
        },
        NavKey::End => GeometryPatch {
            left: left(100.0),
            top: top(100.0),
            ..Default::default()
        },
        NavKey::Escape => GeometryPatch::default(),
    }
}

/// Grow or shrink one edge by a keyboard step.
///
/// Growth stops at the container boundary; shrinking stops at `min_size`.
/// Keys that do not act along `direction` yield an empty patch.
pub fn resize_by_key(
    key: NavKey,
    direction: Direction,
    g: &WindowGeometry,
    step: f64,
    min_size: f64,
) -> GeometryPatch {
    let shrink_width = step.min((g.width - min_size).max(0.0));
    let shrink_height = step.min((g.height - min_size).max(0.0));
    match (direction, key) {
        (Direction::Top, NavKey::ArrowUp) => {
            let grow = step.min(g.top.max(0.0));
            GeometryPatch {
                top: Some(g.top - grow),
                height: Some(g.height + grow),
                ..Default::default()
            }
        }
        (Direction::Top, NavKey::ArrowDown) => GeometryPatch {
            top: Some(g.top + shrink_height),
            height: Some(g.height - shrink_height),
            ..Default::default()
        },
        (Direction::Bottom, NavKey::ArrowDown) => {
            let grow = step.min((100.0 - g.top - g.height).max(0.0));
            GeometryPatch {
                height: Some(g.height + grow),
                ..Default::default()
            }
        }
        (Direction::Bottom, NavKey::ArrowUp) => GeometryPatch {
            height: Some(g.height - shrink_height),
            ..Default::default()
        },
        (Direction::Left, NavKey::ArrowLeft) => {
            let grow = step.min(g.left.max(0.0));
            GeometryPatch {
                left: Some(g.left - grow),
                width: Some(g.width + grow),
                ..Default::default()
            }
        }
        (Direction::Left, NavKey::ArrowRight) => GeometryPatch {
            left: Some(g.left + shrink_width),
            width: Some(g.width - shrink_width),
            ..Default::default()
        },
        (Direction::Right, NavKey::ArrowRight) => {
            let grow = step.min((100.0 - g.left - g.width).max(0.0));
            GeometryPatch {
                width: Some(g.width + grow),
                ..Default::default()
            }
        }
        (Direction::Right, NavKey::ArrowLeft) => GeometryPatch {
            width: Some(g.width - shrink_width),
            ..Default::default()
        },
        _ => GeometryPatch::default(),
    }
}

/// Keyboard resize across every direction of a grip, merged in order.
pub fn resize_by_key_all(
    key: NavKey,
    directions: &[Direction],
    g: &WindowGeometry,
    step: f64,
    min_size: f64,
) -> GeometryPatch {
    directions
        .iter()
        .map(|d| resize_by_key(key, *d, g, step, min_size))
        .fold(GeometryPatch::default(), GeometryPatch::merge)
}
