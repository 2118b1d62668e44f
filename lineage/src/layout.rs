//! Layout engine: converts a flat member list into generation rows and
//! parent→child connector curves.
//!
//! Generations come from a traversal that starts at every root at once.
//! Child links cost one generation, spouse links cost none, so the traversal
//! runs on a deque (zero-cost steps at the front) and every member gets its
//! minimal depth. Members the traversal never reaches, which only happens
//! with relationship cycles, are collected into an orphan row below the tree
//! instead of being dropped.
//!
//! Coordinates are world units. Row `g` sits at `y = g * (NODE_HEIGHT + GAP_Y)`
//! and each row is centered on `x = 0`, with node `x` being the card's left
//! edge.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::collections::{HashMap, HashSet, VecDeque};

use crate::consts::{CURVE_OFFSET, GAP_X, GAP_Y, NODE_HEIGHT, NODE_WIDTH};
use crate::member::{FamilyMember, index_members};
use crate::viewport::Point;

/// A member card placed in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    /// Left edge of the card.
    pub x: f64,
    /// Top edge of the card.
    pub y: f64,
    /// Generation row, or `None` for members in the orphan row.
    pub generation: Option<usize>,
    /// The member shown on the card.
    pub member: FamilyMember,
}

impl LayoutNode {
    /// Anchor for connectors to this member's children.
    #[must_use]
    pub fn bottom_center(&self) -> Point {
        Point::new(self.x + NODE_WIDTH / 2.0, self.y + NODE_HEIGHT)
    }

    /// Anchor for the connector from this member's parents.
    #[must_use]
    pub fn top_center(&self) -> Point {
        Point::new(self.x + NODE_WIDTH / 2.0, self.y)
    }

    /// Whether `world` falls inside the card.
    #[must_use]
    pub fn contains(&self, world: Point) -> bool {
        world.x >= self.x && world.x <= self.x + NODE_WIDTH && world.y >= self.y && world.y <= self.y + NODE_HEIGHT
    }
}

/// A parent→child connector from the parent's bottom-center to the child's top-center.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// `"<parent id>-<child id>"`.
    pub id: String,
}

impl LayoutEdge {
    /// Cubic Bézier control points producing a vertical S-curve.
    #[must_use]
    pub fn control_points(&self) -> (Point, Point) {
        (Point::new(self.x1, self.y1 + CURVE_OFFSET), Point::new(self.x2, self.y2 - CURVE_OFFSET))
    }
}

/// Result of laying out a member list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    /// Members reached from a root, row by row.
    pub nodes: Vec<LayoutNode>,
    /// Members unreachable from any root, in their own row below the tree.
    pub orphans: Vec<LayoutNode>,
    /// Parent→child connectors between placed members.
    pub edges: Vec<LayoutEdge>,
}

impl Layout {
    /// Returns `true` if nothing was placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.orphans.is_empty()
    }

    /// Every placed card, tree rows first, then orphans.
    pub fn all_nodes(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter().chain(self.orphans.iter())
    }
}

/// Lay out `members` into generation rows, an orphan row, and connectors.
///
/// Pure: the same input always yields the same layout. Siblings keep their
/// input order.
#[must_use]
pub fn compute(members: &[FamilyMember]) -> Layout {
    if members.is_empty() {
        return Layout::default();
    }

    let graph = Relations::new(members);
    let generations = assign_generations(members, &graph);

    let mut rows: Vec<Vec<&FamilyMember>> = Vec::new();
    let mut unreached: Vec<&FamilyMember> = Vec::new();
    for m in members {
        match generations.get(m.id.as_str()) {
            Some(&g) => {
                if rows.len() <= g {
                    rows.resize_with(g + 1, Vec::new);
                }
                rows[g].push(m);
            }
            None => unreached.push(m),
        }
    }

    let mut nodes = Vec::new();
    for (g, row) in rows.iter().enumerate() {
        place_row(row, g, Some(g), &mut nodes);
    }

    let mut orphans = Vec::new();
    place_row(&unreached, rows.len(), None, &mut orphans);

    let edges = connect(&nodes, &orphans, &graph);
    Layout { nodes, orphans, edges }
}

/// Assign each reachable member its generation.
///
/// Roots are members whose own `parents` list is empty or unresolvable,
/// except "married-in" members whose spouse does list a resolvable parent;
/// those are levelled through the spouse. Being named in someone else's
/// `children` does not stop a member from being a root. When no member
/// qualifies, the first one is used.
fn assign_generations<'a>(members: &'a [FamilyMember], graph: &Relations<'a>) -> HashMap<&'a str, usize> {
    let mut roots: Vec<&str> = members
        .iter()
        .map(|m| m.id.as_str())
        .filter(|id| !graph.lists_parent(id) && !graph.spouses_of(id).iter().any(|s| graph.lists_parent(s)))
        .collect();
    if roots.is_empty() {
        roots.extend(members.first().map(|m| m.id.as_str()));
    }

    let mut generations: HashMap<&str, usize> = HashMap::new();
    let mut queue: VecDeque<(&str, usize)> = roots.into_iter().map(|id| (id, 0)).collect();

    while let Some((id, g)) = queue.pop_front() {
        if generations.contains_key(id) {
            continue;
        }
        generations.insert(id, g);

        for &spouse in graph.spouses_of(id) {
            if !generations.contains_key(spouse) {
                queue.push_front((spouse, g));
            }
        }
        for &child in graph.children_of(id) {
            if !generations.contains_key(child) {
                queue.push_back((child, g + 1));
            }
        }
    }

    generations
}

#[allow(clippy::cast_precision_loss)]
fn place_row(row: &[&FamilyMember], row_index: usize, generation: Option<usize>, out: &mut Vec<LayoutNode>) {
    if row.is_empty() {
        return;
    }
    let step = NODE_WIDTH + GAP_X;
    let row_width = row.len() as f64 * step - GAP_X;
    let start_x = -row_width / 2.0;
    let y = row_index as f64 * (NODE_HEIGHT + GAP_Y);

    for (i, m) in row.iter().enumerate() {
        out.push(LayoutNode { x: start_x + i as f64 * step, y, generation, member: (*m).clone() });
    }
}

fn connect(nodes: &[LayoutNode], orphans: &[LayoutNode], graph: &Relations<'_>) -> Vec<LayoutEdge> {
    let mut placed: HashMap<&str, &LayoutNode> = HashMap::new();
    for n in nodes.iter().chain(orphans) {
        placed.insert(n.member.id.as_str(), n);
    }

    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut edges = Vec::new();
    for n in nodes.iter().chain(orphans) {
        let parent_id = n.member.id.as_str();
        let Some(&parent) = placed.get(parent_id) else {
            continue;
        };
        for &child_id in graph.children_of(parent_id) {
            let Some(&child) = placed.get(child_id) else {
                continue;
            };
            if !seen.insert((parent_id, child_id)) {
                continue;
            }
            let from = parent.bottom_center();
            let to = child.top_center();
            edges.push(LayoutEdge { x1: from.x, y1: from.y, x2: to.x, y2: to.y, id: format!("{parent_id}-{child_id}") });
        }
    }
    edges
}

/// Resolved relationship adjacency over a member list.
///
/// Parent→child links are the union of every `children` entry and every
/// `parents` entry, and spouse links are made symmetric. Ids that do not
/// resolve, and self-links, are dropped. `listed_parent` holds only members
/// whose own `parents` field resolved, which is what root selection reads.
struct Relations<'a> {
    children: HashMap<&'a str, Vec<&'a str>>,
    spouses: HashMap<&'a str, Vec<&'a str>>,
    listed_parent: HashSet<&'a str>,
}

impl<'a> Relations<'a> {
    fn new(members: &'a [FamilyMember]) -> Self {
        let index = index_members(members);
        let mut rel = Self { children: HashMap::new(), spouses: HashMap::new(), listed_parent: HashSet::new() };

        for m in members {
            let id = m.id.as_str();
            for child in &m.children {
                if let Some(&child) = index.get(child.as_str()) {
                    rel.link_child(id, child.id.as_str());
                }
            }
            for parent in &m.parents {
                if let Some(&parent) = index.get(parent.as_str()) {
                    if rel.link_child(parent.id.as_str(), id) {
                        rel.listed_parent.insert(id);
                    }
                }
            }
            for spouse in &m.spouses {
                if let Some(&spouse) = index.get(spouse.as_str()) {
                    rel.link_spouses(id, spouse.id.as_str());
                }
            }
        }
        rel
    }

    /// Returns `false` for a self-link, which is dropped.
    fn link_child(&mut self, parent: &'a str, child: &'a str) -> bool {
        if parent == child {
            return false;
        }
        push_unique(self.children.entry(parent).or_default(), child);
        true
    }

    fn link_spouses(&mut self, a: &'a str, b: &'a str) {
        if a == b {
            return;
        }
        push_unique(self.spouses.entry(a).or_default(), b);
        push_unique(self.spouses.entry(b).or_default(), a);
    }

    fn lists_parent(&self, id: &str) -> bool {
        self.listed_parent.contains(id)
    }

    fn children_of(&self, id: &str) -> &[&'a str] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn spouses_of(&self, id: &str) -> &[&'a str] {
        self.spouses.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn push_unique<'a>(list: &mut Vec<&'a str>, id: &'a str) {
    if !list.contains(&id) {
        list.push(id);
    }
}
