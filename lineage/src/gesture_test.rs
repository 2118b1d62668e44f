#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// GestureState
// =============================================================

#[test]
fn gesture_default_is_idle() {
    assert_eq!(GestureState::default(), GestureState::Idle);
}

#[test]
fn controller_starts_idle_with_default_view() {
    let c = ViewportController::new();
    assert_eq!(c.state(), GestureState::Idle);
    assert_eq!(c.viewport(), Viewport::default());
    assert!(!c.is_dragging());
}

// =============================================================
// Drag
// =============================================================

#[test]
fn drag_applies_delta_exactly_once() {
    let mut c = ViewportController::new();
    c.begin_drag(pt(10.0, 10.0));
    assert!(c.update_drag(pt(15.0, 18.0)));
    assert_eq!(c.viewport().x, 5.0);
    assert_eq!(c.viewport().y, 8.0);
}

#[test]
fn drag_accumulates_from_last_sample() {
    let mut c = ViewportController::new();
    c.begin_drag(pt(0.0, 0.0));
    c.update_drag(pt(10.0, 0.0));
    c.update_drag(pt(12.0, -4.0));
    assert_eq!(c.viewport().x, 12.0);
    assert_eq!(c.viewport().y, -4.0);
}

#[test]
fn drag_same_position_is_zero_delta() {
    let mut c = ViewportController::new();
    c.begin_drag(pt(50.0, 50.0));
    c.update_drag(pt(50.0, 50.0));
    assert_eq!(c.viewport().x, 0.0);
    assert_eq!(c.viewport().y, 0.0);
}

#[test]
fn update_drag_without_begin_is_noop() {
    let mut c = ViewportController::new();
    assert!(!c.update_drag(pt(100.0, 100.0)));
    assert_eq!(c.viewport(), Viewport::default());
}

#[test]
fn update_drag_after_end_is_noop() {
    let mut c = ViewportController::new();
    c.begin_drag(pt(0.0, 0.0));
    c.end_drag();
    assert!(!c.update_drag(pt(30.0, 30.0)));
    assert_eq!(c.viewport().x, 0.0);
    assert_eq!(c.state(), GestureState::Idle);
}

#[test]
fn drag_does_not_touch_scale() {
    let mut c = ViewportController::new();
    c.begin_drag(pt(0.0, 0.0));
    c.update_drag(pt(300.0, -200.0));
    assert_eq!(c.viewport().scale, 0.8);
}

// =============================================================
// Zoom
// =============================================================

#[test]
fn zoom_two_large_negative_steps_clamps_to_floor() {
    let mut c = ViewportController::new();
    c.zoom(-1.0);
    c.zoom(-1.0);
    assert_eq!(c.viewport().scale, 0.2);
}

#[test]
fn zoom_clamps_to_ceiling() {
    let mut c = ViewportController::new();
    for _ in 0..50 {
        c.zoom(0.3);
    }
    assert_eq!(c.viewport().scale, 2.0);
}

#[test]
fn wheel_scroll_down_zooms_out() {
    let mut c = ViewportController::new();
    c.wheel(100.0);
    assert!(approx_eq(c.viewport().scale, 0.7));
}

#[test]
fn wheel_scroll_up_zooms_in() {
    let mut c = ViewportController::new();
    c.wheel(-200.0);
    assert!(approx_eq(c.viewport().scale, 1.0));
}

#[test]
fn any_zoom_sequence_stays_in_range() {
    let mut c = ViewportController::new();
    let deltas = [0.7, -3.0, 0.05, 12.0, -0.4, f64::NAN, -0.01, 1e9, -1e9];
    for d in deltas {
        c.zoom(d);
        let s = c.viewport().scale;
        assert!((0.2..=2.0).contains(&s), "scale {s} out of range after zoom({d})");
    }
}

// =============================================================
// Pinch
// =============================================================

#[test]
fn pinch_spread_zooms_in() {
    let mut c = ViewportController::new();
    c.begin_pinch(pt(0.0, 0.0), pt(100.0, 0.0));
    assert!(c.update_pinch(pt(0.0, 0.0), pt(120.0, 0.0)));
    // 20px wider * 0.01 = +0.2
    assert!(approx_eq(c.viewport().scale, 1.0));
}

#[test]
fn pinch_uses_last_sample_not_start() {
    let mut c = ViewportController::new();
    c.begin_pinch(pt(0.0, 0.0), pt(100.0, 0.0));
    c.update_pinch(pt(0.0, 0.0), pt(110.0, 0.0));
    c.update_pinch(pt(0.0, 0.0), pt(110.0, 0.0));
    assert!(approx_eq(c.viewport().scale, 0.9));
}

#[test]
fn pinch_squeeze_clamps_to_floor() {
    let mut c = ViewportController::new();
    c.begin_pinch(pt(0.0, 0.0), pt(500.0, 0.0));
    c.update_pinch(pt(0.0, 0.0), pt(10.0, 0.0));
    assert_eq!(c.viewport().scale, 0.2);
}

#[test]
fn pinch_without_begin_is_skipped() {
    let mut c = ViewportController::new();
    assert!(!c.update_pinch(pt(0.0, 0.0), pt(300.0, 0.0)));
    assert_eq!(c.viewport().scale, 0.8);
}

#[test]
fn pinch_with_zero_prior_distance_is_skipped() {
    let mut c = ViewportController::new();
    c.begin_pinch(pt(40.0, 40.0), pt(40.0, 40.0));
    assert!(!c.update_pinch(pt(0.0, 0.0), pt(300.0, 0.0)));
    let s = c.viewport().scale;
    assert!(s.is_finite());
    assert_eq!(s, 0.8);
}

#[test]
fn pinch_started_at_zero_distance_recovers_on_next_sample() {
    let mut c = ViewportController::new();
    c.begin_pinch(pt(40.0, 40.0), pt(40.0, 40.0));
    assert!(!c.update_pinch(pt(0.0, 0.0), pt(140.0, 0.0)));
    assert!(c.update_pinch(pt(0.0, 0.0), pt(160.0, 0.0)));
    // 20px wider * 0.01 = +0.2
    assert!(approx_eq(c.viewport().scale, 1.0));
}

#[test]
fn wheel_nan_keeps_current_scale() {
    let mut c = ViewportController::new();
    c.zoom(0.7);
    c.wheel(f64::NAN);
    assert!(approx_eq(c.viewport().scale, 1.5));
}

#[test]
fn zoom_infinity_clamps_to_ceiling() {
    let mut c = ViewportController::new();
    c.zoom(f64::INFINITY);
    assert_eq!(c.viewport().scale, 2.0);
}

#[test]
fn pinch_with_non_finite_sample_is_skipped() {
    let mut c = ViewportController::new();
    c.begin_pinch(pt(0.0, 0.0), pt(100.0, 0.0));
    assert!(!c.update_pinch(pt(0.0, 0.0), pt(f64::NAN, 0.0)));
    assert_eq!(c.viewport().scale, 0.8);
}

#[test]
fn update_drag_during_pinch_is_noop() {
    let mut c = ViewportController::new();
    c.begin_pinch(pt(0.0, 0.0), pt(100.0, 0.0));
    assert!(!c.update_drag(pt(50.0, 50.0)));
    assert_eq!(c.viewport().x, 0.0);
}

// =============================================================
// Touch dispatch
// =============================================================

#[test]
fn touch_one_finger_drags() {
    let mut c = ViewportController::new();
    c.touch_start(&[pt(10.0, 10.0)]);
    assert!(c.is_dragging());
    c.touch_move(&[pt(20.0, 5.0)]);
    assert_eq!(c.viewport().x, 10.0);
    assert_eq!(c.viewport().y, -5.0);
}

#[test]
fn touch_two_fingers_pinch() {
    let mut c = ViewportController::new();
    c.touch_start(&[pt(0.0, 0.0), pt(0.0, 100.0)]);
    assert!(matches!(c.state(), GestureState::Pinching { .. }));
    c.touch_move(&[pt(0.0, 0.0), pt(0.0, 80.0)]);
    assert!(approx_eq(c.viewport().scale, 0.6));
}

#[test]
fn touch_end_returns_to_idle() {
    let mut c = ViewportController::new();
    c.touch_start(&[pt(0.0, 0.0), pt(0.0, 100.0)]);
    c.touch_end();
    assert_eq!(c.state(), GestureState::Idle);
    assert!(!c.touch_move(&[pt(0.0, 0.0), pt(0.0, 300.0)]));
}

#[test]
fn touch_move_with_no_touches_is_noop() {
    let mut c = ViewportController::new();
    c.touch_start(&[pt(0.0, 0.0)]);
    assert!(!c.touch_move(&[]));
}

// =============================================================
// Reset
// =============================================================

#[test]
fn reset_restores_default_from_any_state() {
    let mut c = ViewportController::new();
    c.begin_drag(pt(0.0, 0.0));
    c.update_drag(pt(-340.0, 912.0));
    c.zoom(0.9);
    c.reset();
    let v = c.viewport();
    assert_eq!(v.x, 0.0);
    assert_eq!(v.y, 0.0);
    assert_eq!(v.scale, 0.8);
    assert_eq!(c.state(), GestureState::Idle);
}

#[test]
fn set_viewport_clamps_scale() {
    let mut c = ViewportController::new();
    c.set_viewport(Viewport { x: 3.0, y: 4.0, scale: 7.0 });
    assert_eq!(c.viewport(), Viewport { x: 3.0, y: 4.0, scale: 2.0 });
}
