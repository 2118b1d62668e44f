//! Shared numeric constants for the lineage crate.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed scale factor.
pub const MIN_SCALE: f64 = 0.2;

/// Largest allowed scale factor.
pub const MAX_SCALE: f64 = 2.0;

/// Scale applied by [`crate::viewport::Viewport::default`] and on reset.
pub const DEFAULT_SCALE: f64 = 0.8;

/// Vertical pan applied after a fresh narrative parse, in pixels.
pub const FRESH_TREE_PAN_Y: f64 = 100.0;

/// Scale change per wheel pixel (negated: scrolling down zooms out).
pub const WHEEL_ZOOM_PER_PX: f64 = 0.001;

/// Scale change per pixel of pinch distance change.
pub const PINCH_ZOOM_PER_PX: f64 = 0.01;

/// Scale step of the on-screen zoom buttons.
pub const ZOOM_STEP: f64 = 0.1;

/// Pointer travel (screen pixels) below which a press-release counts as a click.
pub const CLICK_SLOP_PX: f64 = 4.0;

// ── Layout ──────────────────────────────────────────────────────

/// Member card width in world units.
pub const NODE_WIDTH: f64 = 220.0;

/// Member card height in world units.
pub const NODE_HEIGHT: f64 = 120.0;

/// Horizontal gap between cards in a row.
pub const GAP_X: f64 = 40.0;

/// Vertical gap between generation rows.
pub const GAP_Y: f64 = 180.0;

/// Vertical offset of connector control points from their anchors.
pub const CURVE_OFFSET: f64 = 80.0;
