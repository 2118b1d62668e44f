//! Gesture model: the state machine that turns pointer and touch input into
//! viewport updates.
//!
//! `GestureState` is the active gesture being tracked between press and
//! release. `ViewportController` owns the [`Viewport`] and exposes the named
//! transitions the host calls from its input callbacks. Only one gesture mode
//! is live at a time; the caller picks drag or pinch from the number of touch
//! points at gesture start.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use crate::consts::{PINCH_ZOOM_PER_PX, WHEEL_ZOOM_PER_PX};
use crate::viewport::{Point, Viewport};

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// One pointer is panning the canvas.
    Dragging {
        /// Screen-space position of the previous sample, used to compute the pan delta.
        last: Point,
    },
    /// Two touches are pinching to zoom.
    Pinching {
        /// Distance between the touches at the previous sample.
        last_distance: f64,
    },
}

/// Owns the viewport transform and updates it from gestures.
#[derive(Debug, Clone, Default)]
pub struct ViewportController {
    viewport: Viewport,
    state: GestureState,
}

impl ViewportController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current transform, as read by the renderer.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The gesture currently being tracked.
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Whether a single-pointer drag is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Replace the transform wholesale, clamping its scale.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Viewport { scale: Viewport::clamp_scale(viewport.scale), ..viewport };
    }

    // --- Drag ---

    /// Start a drag at `pos`.
    pub fn begin_drag(&mut self, pos: Point) {
        self.state = GestureState::Dragging { last: pos };
    }

    /// Pan by the movement since the previous sample. No-op unless dragging.
    ///
    /// Returns `true` when the transform changed.
    pub fn update_drag(&mut self, pos: Point) -> bool {
        let GestureState::Dragging { last } = self.state else {
            return false;
        };
        self.viewport.pan_by(pos.x - last.x, pos.y - last.y);
        self.state = GestureState::Dragging { last: pos };
        true
    }

    /// Finish any active gesture.
    pub fn end_drag(&mut self) {
        self.state = GestureState::Idle;
    }

    // --- Zoom ---

    /// Add `delta` to the scale and clamp.
    pub fn zoom(&mut self, delta: f64) {
        self.viewport.zoom_by(delta);
    }

    /// Zoom from a wheel event; positive `delta_y` (scroll down) zooms out.
    pub fn wheel(&mut self, delta_y: f64) {
        self.zoom(delta_y * -WHEEL_ZOOM_PER_PX);
    }

    // --- Pinch ---

    /// Record the starting distance between two touches.
    pub fn begin_pinch(&mut self, a: Point, b: Point) {
        self.state = GestureState::Pinching { last_distance: a.distance(b) };
    }

    /// Zoom proportionally to the distance change since the previous sample.
    ///
    /// The sample is skipped when no pinch is active, the new distance is
    /// non-finite, or the recorded distance is not usable (zero or
    /// non-finite). In the last case the new distance is still recorded so
    /// the next sample can zoom. Returns `true` when the transform changed.
    pub fn update_pinch(&mut self, a: Point, b: Point) -> bool {
        let GestureState::Pinching { last_distance } = self.state else {
            return false;
        };
        let distance = a.distance(b);
        if !distance.is_finite() {
            return false;
        }
        self.state = GestureState::Pinching { last_distance: distance };
        if !last_distance.is_finite() || last_distance <= 0.0 {
            return false;
        }
        self.zoom((distance - last_distance) * PINCH_ZOOM_PER_PX);
        true
    }

    // --- Touch dispatch ---

    /// Begin a touch gesture: one touch drags, two touches pinch.
    pub fn touch_start(&mut self, touches: &[Point]) {
        match touches {
            [one] => self.begin_drag(*one),
            [a, b, ..] => self.begin_pinch(*a, *b),
            [] => self.end_drag(),
        }
    }

    /// Continue a touch gesture. Returns `true` when the transform changed.
    pub fn touch_move(&mut self, touches: &[Point]) -> bool {
        match touches {
            [one] => self.update_drag(*one),
            [a, b, ..] => self.update_pinch(*a, *b),
            [] => false,
        }
    }

    /// End a touch gesture.
    pub fn touch_end(&mut self) {
        self.end_drag();
    }

    /// Restore the default transform and drop any gesture.
    pub fn reset(&mut self) {
        self.viewport = Viewport::default();
        self.state = GestureState::Idle;
    }
}
