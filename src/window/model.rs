// Window data model: committed percentage geometry, partial patches, and transient deltas.

use serde::{Deserialize, Serialize};

use crate::geometry::{bounded, percentage_to_unit, PixelRect, PixelSize};

/// Position and size of a window as percentages (0–100) of its boundary container.
///
/// At every committed state: `left >= 0`, `top >= 0`, `left + width <= 100`,
/// `top + height <= 100`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// Floating point slack allowed by [`WindowGeometry::satisfies_bounds`].
const BOUNDS_EPSILON: f64 = 1e-9;

impl WindowGeometry {
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Pixel rect this geometry occupies inside `container`.
    pub fn project(&self, container: PixelSize) -> PixelRect {
        PixelRect::new(
            percentage_to_unit(self.left, container.width),
            percentage_to_unit(self.top, container.height),
            percentage_to_unit(self.width, container.width),
            percentage_to_unit(self.height, container.height),
        )
    }

    /// Whether the geometry lies fully inside the 0–100 space.
    pub fn satisfies_bounds(&self) -> bool {
        self.left >= -BOUNDS_EPSILON
            && self.top >= -BOUNDS_EPSILON
            && self.width >= -BOUNDS_EPSILON
            && self.height >= -BOUNDS_EPSILON
            && self.left + self.width <= 100.0 + BOUNDS_EPSILON
            && self.top + self.height <= 100.0 + BOUNDS_EPSILON
    }

    /// Closest geometry that satisfies the committed-state invariant.
    ///
    /// Sizes are capped at 100 first, then positions are pulled back inside.
    #[must_use]
    pub fn confined(&self) -> Self {
        let width = bounded(self.width, 0.0, 100.0);
        let height = bounded(self.height, 0.0, 100.0);
        Self {
            top: bounded(self.top, 0.0, 100.0 - height),
            left: bounded(self.left, 0.0, 100.0 - width),
            width,
            height,
        }
    }
}

/// A partial [`WindowGeometry`]: only the fields an interaction changed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl GeometryPatch {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.left.is_none() && self.width.is_none() && self.height.is_none()
    }

    /// Key-by-key merge; fields set in `later` overwrite fields set in `self`.
    #[must_use]
    pub fn merge(self, later: Self) -> Self {
        Self {
            top: later.top.or(self.top),
            left: later.left.or(self.left),
            width: later.width.or(self.width),
            height: later.height.or(self.height),
        }
    }

    /// The geometry obtained by overwriting `base` with every set field.
    pub fn apply_to(&self, base: &WindowGeometry) -> WindowGeometry {
        WindowGeometry {
            top: self.top.unwrap_or(base.top),
            left: self.left.unwrap_or(base.left),
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
        }
    }

    /// Read from `geometry` exactly the fields that are set in `self`.
    #[must_use]
    pub fn pick(&self, geometry: &WindowGeometry) -> Self {
        Self {
            top: self.top.map(|_| geometry.top),
            left: self.left.map(|_| geometry.left),
            width: self.width.map(|_| geometry.width),
            height: self.height.map(|_| geometry.height),
        }
    }
}

/// In-flight offsets applied on top of committed geometry while a session runs.
///
/// `top_diff`/`left_diff` are pixels (rendered as a translation);
/// `width_diff`/`height_diff` are percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransientDelta {
    pub top_diff: f64,
    pub left_diff: f64,
    pub width_diff: f64,
    pub height_diff: f64,
}

impl TransientDelta {
    /// Overwrite the fields set in `patch`; unset fields keep their value.
    pub fn apply(&mut self, patch: DeltaPatch) {
        if let Some(v) = patch.top_diff {
            self.top_diff = v;
        }
        if let Some(v) = patch.left_diff {
            self.left_diff = v;
        }
        if let Some(v) = patch.width_diff {
            self.width_diff = v;
        }
        if let Some(v) = patch.height_diff {
            self.height_diff = v;
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Partial [`TransientDelta`] produced by resolving one resize direction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeltaPatch {
    pub top_diff: Option<f64>,
    pub left_diff: Option<f64>,
    pub width_diff: Option<f64>,
    pub height_diff: Option<f64>,
}

impl DeltaPatch {
    /// Key-by-key merge; fields set in `later` win.
    #[must_use]
    pub fn merge(self, later: Self) -> Self {
        Self {
            top_diff: later.top_diff.or(self.top_diff),
            left_diff: later.left_diff.or(self.left_diff),
            width_diff: later.width_diff.or(self.width_diff),
            height_diff: later.height_diff.or(self.height_diff),
        }
    }
}

/// A cardinal edge of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}
