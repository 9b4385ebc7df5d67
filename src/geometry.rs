// Geometry primitives: pixel/percentage conversion, clamping, and pixel rects.

use crate::window::model::WindowGeometry;

/// Ratio of `value` to `total`. Zero when either operand is zero.
pub fn unit_to_ratio(value: f64, total: f64) -> f64 {
    if value == 0.0 || total == 0.0 {
        return 0.0;
    }
    value / total
}

/// Convert a pixel value into a percentage of `total`. Zero when `total` is zero.
pub fn unit_to_percent(value: f64, total: f64) -> f64 {
    unit_to_ratio(value, total) * 100.0
}

/// Convert a percentage of `total` back into pixels.
pub fn percentage_to_unit(percentage: f64, total: f64) -> f64 {
    percentage * total / 100.0
}

/// Clamp `value` into `[min, max]`.
///
/// Unlike `f64::clamp` this never panics: an inverted range yields `min`.
pub fn bounded(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Measured size of a boundary container in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

impl PixelSize {
    /// Stand-in for a container that could not be found.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either axis has no extent, so no percentage basis exists.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A rectangle in pixels, relative to the boundary container's origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    /// Create a new rectangle.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if a point (px, py) is inside this rectangle.
    pub fn contains_point(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Express this rect as percentages of `container`.
    pub fn to_percent(&self, container: PixelSize) -> WindowGeometry {
        WindowGeometry {
            top: unit_to_percent(self.y, container.height),
            left: unit_to_percent(self.x, container.width),
            width: unit_to_percent(self.width, container.width),
            height: unit_to_percent(self.height, container.height),
        }
    }
}
