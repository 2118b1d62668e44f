#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::{DEFAULT_SCALE, FRESH_TREE_PAN_Y, MAX_SCALE, MIN_SCALE};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Pan/zoom transform applied to the family-tree canvas.
///
/// `x` / `y` are unbounded pan offsets in CSS pixels, measured from the
/// canvas origin (see [`Viewport::screen_to_world`]).
/// `scale` is kept within `[MIN_SCALE, MAX_SCALE]` by every mutator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, scale: DEFAULT_SCALE }
    }
}

impl Viewport {
    /// The view used right after a story has been parsed into a new tree.
    #[must_use]
    pub fn fresh_tree() -> Self {
        Self { x: 0.0, y: FRESH_TREE_PAN_Y, scale: DEFAULT_SCALE }
    }

    /// Clamp a scale factor into the allowed range. Infinities clamp to the
    /// nearest bound; NaN has no bound and falls back to the default scale.
    #[must_use]
    pub fn clamp_scale(scale: f64) -> f64 {
        if scale.is_nan() { DEFAULT_SCALE } else { scale.clamp(MIN_SCALE, MAX_SCALE) }
    }

    /// Add `delta` to the scale, clamping the result. A NaN delta is skipped
    /// and leaves the scale unchanged.
    pub fn zoom_by(&mut self, delta: f64) {
        if delta.is_nan() {
            return;
        }
        self.scale = Self::clamp_scale(self.scale + delta);
    }

    /// Shift the pan offset by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Convert a screen-space point to world coordinates.
    ///
    /// `origin` is the screen position of world `(0, 0)` before panning
    /// (the horizontal center of the canvas, top edge).
    #[must_use]
    pub fn screen_to_world(&self, screen: Point, origin: Point) -> Point {
        Point {
            x: (screen.x - origin.x - self.x) / self.scale,
            y: (screen.y - origin.y - self.y) / self.scale,
        }
    }

    /// Convert a world-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point, origin: Point) -> Point {
        Point {
            x: world.x * self.scale + self.x + origin.x,
            y: world.y * self.scale + self.y + origin.y,
        }
    }
}
