use super::*;
use crate::consts::{GAP_Y, NODE_HEIGHT, NODE_WIDTH};
use crate::layout::compute;
use crate::member::FamilyMember;

fn family() -> Layout {
    let mut jan = FamilyMember::new("a", "Jan");
    jan.children = vec!["b".into()];
    let mut karel = FamilyMember::new("b", "Karel");
    karel.parents = vec!["a".into()];
    compute(&[jan, karel])
}

// =============================================================
// node_at
// =============================================================

#[test]
fn hit_card_center() {
    let layout = family();
    let hit = node_at(&layout, Point::new(0.0, NODE_HEIGHT / 2.0));
    assert_eq!(hit.map(|n| n.member.id.as_str()), Some("a"));
}

#[test]
fn hit_second_generation() {
    let layout = family();
    let y = NODE_HEIGHT + GAP_Y + 10.0;
    let hit = node_at(&layout, Point::new(0.0, y));
    assert_eq!(hit.map(|n| n.member.id.as_str()), Some("b"));
}

#[test]
fn miss_in_row_gap() {
    let layout = family();
    assert!(node_at(&layout, Point::new(0.0, NODE_HEIGHT + GAP_Y / 2.0)).is_none());
}

#[test]
fn miss_outside_row() {
    let layout = family();
    assert!(node_at(&layout, Point::new(NODE_WIDTH, 10.0)).is_none());
}

#[test]
fn miss_on_empty_layout() {
    assert!(node_at(&Layout::default(), Point::new(0.0, 0.0)).is_none());
}

#[test]
fn hit_orphan_card() {
    let mut c = FamilyMember::new("c", "C");
    c.parents = vec!["d".into()];
    let mut d = FamilyMember::new("d", "D");
    d.parents = vec!["c".into()];
    let layout = compute(&[FamilyMember::new("r", "Root"), c, d]);
    let orphan = &layout.orphans[0];
    let hit = node_at(&layout, Point::new(orphan.x + 1.0, orphan.y + 1.0));
    assert_eq!(hit.map(|n| n.member.id.as_str()), Some("c"));
}

// =============================================================
// node_at_screen
// =============================================================

#[test]
fn screen_hit_accounts_for_pan_and_scale() {
    let layout = family();
    let origin = Point::new(500.0, 0.0);
    let viewport = Viewport { x: 0.0, y: 100.0, scale: 0.5 };
    // world (0, 60) → screen (500, 130)
    let hit = node_at_screen(&layout, &viewport, origin, Point::new(500.0, 130.0));
    assert_eq!(hit.map(|n| n.member.id.as_str()), Some("a"));
    // screen (500, 95) is above the first row
    assert!(node_at_screen(&layout, &viewport, origin, Point::new(500.0, 95.0)).is_none());
}
