#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::layout::{Layout, LayoutNode};
use crate::viewport::{Point, Viewport};

/// Which card (if any) is under `world_pt`.
///
/// Cards are painted tree rows first and orphans last, so the search runs in
/// reverse paint order and the top-most card wins.
#[must_use]
pub fn node_at(layout: &Layout, world_pt: Point) -> Option<&LayoutNode> {
    layout
        .orphans
        .iter()
        .rev()
        .chain(layout.nodes.iter().rev())
        .find(|n| n.contains(world_pt))
}

/// Screen-space variant of [`node_at`].
#[must_use]
pub fn node_at_screen<'a>(layout: &'a Layout, viewport: &Viewport, origin: Point, screen_pt: Point) -> Option<&'a LayoutNode> {
    node_at(layout, viewport.screen_to_world(screen_pt, origin))
}
