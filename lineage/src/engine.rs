#[cfg(feature = "browser")]
use wasm_bindgen::{JsCast, JsValue};
#[cfg(feature = "browser")]
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{CLICK_SLOP_PX, ZOOM_STEP};
use crate::gesture::ViewportController;
use crate::hit;
use crate::layout::{self, Layout};
use crate::member::{FamilyMember, MemberId, WorkingSet};
use crate::storage::{self, Storage};
use crate::viewport::{Point, Viewport};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The scene changed and should be redrawn.
    RenderNeeded,
    /// The detail panel should show this member, or close.
    SelectionChanged(Option<MemberId>),
    /// CSS cursor for the canvas element.
    SetCursor(String),
}

/// Which half of the studio is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// The story/document input screen.
    #[default]
    Input,
    /// The rendered family tree.
    Visual,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
/// Every mutation of the working set recomputes the cached layout and, where
/// the transition persists, writes through the given [`Storage`].
#[derive(Debug, Default)]
pub struct EngineCore {
    members: WorkingSet,
    controller: ViewportController,
    layout: Layout,
    mode: ViewMode,
    selected: Option<MemberId>,
    /// Where the current press started, while it may still become a click.
    press: Option<Point>,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Restore the working set from storage. Shows the tree if anything was stored.
    pub fn load_from(&mut self, store: &dyn Storage) -> Vec<Action> {
        let members = storage::load_members(store);
        log::debug!("engine: restored {} members", members.len());
        self.mode = if members.is_empty() { ViewMode::Input } else { ViewMode::Visual };
        self.members = WorkingSet::from_members(members);
        self.relayout();
        vec![Action::RenderNeeded]
    }

    /// Replace the working set with a freshly parsed narrative.
    pub fn replace_members(&mut self, members: Vec<FamilyMember>, store: &dyn Storage) -> Vec<Action> {
        let mut actions = self.clear_selection();
        self.members.replace(members);
        self.mode = ViewMode::Visual;
        self.controller.set_viewport(Viewport::fresh_tree());
        self.relayout();
        self.persist(store);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Append members extracted from a scanned document.
    pub fn merge_members(&mut self, members: Vec<FamilyMember>, store: &dyn Storage) -> Vec<Action> {
        self.members.merge(members);
        if self.mode == ViewMode::Input {
            self.mode = ViewMode::Visual;
        }
        self.relayout();
        self.persist(store);
        vec![Action::RenderNeeded]
    }

    /// Drop every member, forget the stored tree, and return to input.
    pub fn clear(&mut self, store: &dyn Storage) -> Vec<Action> {
        let mut actions = self.clear_selection();
        self.members.clear();
        self.relayout();
        if let Err(e) = storage::clear_members(store) {
            log::warn!("engine: failed to clear stored tree: {e}");
        }
        self.mode = ViewMode::Input;
        self.press = None;
        self.controller.end_drag();
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Switch between the input screen and the tree without touching data.
    pub fn set_mode(&mut self, mode: ViewMode) -> Vec<Action> {
        if self.mode == mode {
            return Vec::new();
        }
        self.mode = mode;
        vec![Action::RenderNeeded]
    }

    /// Select a member (or close the detail panel with `None`).
    pub fn select(&mut self, id: Option<MemberId>) -> Vec<Action> {
        if self.selected == id {
            return Vec::new();
        }
        self.selected = id.clone();
        vec![Action::SelectionChanged(id), Action::RenderNeeded]
    }

    /// Update the canvas size in CSS pixels.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.viewport_width = width;
        self.viewport_height = height;
        vec![Action::RenderNeeded]
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, screen_pt: Point) -> Vec<Action> {
        if self.mode != ViewMode::Visual {
            return Vec::new();
        }
        self.controller.begin_drag(screen_pt);
        self.press = Some(screen_pt);
        vec![Action::SetCursor("grabbing".into())]
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        if self.controller.update_drag(screen_pt) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Finish a drag. A release close to the press point is a click: it
    /// selects the card underneath, or clears the selection on empty canvas.
    pub fn on_pointer_up(&mut self, screen_pt: Point) -> Vec<Action> {
        if !self.controller.is_dragging() {
            return Vec::new();
        }
        self.controller.end_drag();
        let mut actions = vec![Action::SetCursor("grab".into())];

        if let Some(press) = self.press.take() {
            if press.distance(screen_pt) <= CLICK_SLOP_PX {
                let picked = self.member_at(screen_pt).map(|m| m.id.clone());
                actions.extend(self.select(picked));
            }
        }
        actions
    }

    /// The pointer left the canvas; abandon any drag without selecting.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.press = None;
        if !self.controller.is_dragging() {
            return Vec::new();
        }
        self.controller.end_drag();
        vec![Action::SetCursor("grab".into())]
    }

    pub fn on_wheel(&mut self, delta_y: f64) -> Vec<Action> {
        if self.mode != ViewMode::Visual {
            return Vec::new();
        }
        self.controller.wheel(delta_y);
        vec![Action::RenderNeeded]
    }

    // --- Touch input ---

    pub fn on_touch_start(&mut self, touches: &[Point]) -> Vec<Action> {
        if self.mode != ViewMode::Visual {
            return Vec::new();
        }
        self.press = None;
        self.controller.touch_start(touches);
        Vec::new()
    }

    pub fn on_touch_move(&mut self, touches: &[Point]) -> Vec<Action> {
        if self.mode != ViewMode::Visual {
            return Vec::new();
        }
        if self.controller.touch_move(touches) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    pub fn on_touch_end(&mut self) -> Vec<Action> {
        self.controller.touch_end();
        Vec::new()
    }

    // --- View controls ---

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.controller.zoom(ZOOM_STEP);
        vec![Action::RenderNeeded]
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.controller.zoom(-ZOOM_STEP);
        vec![Action::RenderNeeded]
    }

    pub fn reset_view(&mut self) -> Vec<Action> {
        self.controller.reset();
        vec![Action::RenderNeeded]
    }

    // --- Queries ---

    #[must_use]
    pub fn members(&self) -> &[FamilyMember] {
        self.members.members()
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.controller.viewport()
    }

    /// Id of the member shown in the detail panel.
    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The member shown in the detail panel, if it is still in the working set.
    #[must_use]
    pub fn selection(&self) -> Option<&FamilyMember> {
        self.selected.as_deref().and_then(|id| self.members.get(id))
    }

    /// Screen position of world `(0, 0)` before panning: top-center of the canvas.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.viewport_width / 2.0, 0.0)
    }

    /// The member whose card is under `screen_pt`.
    #[must_use]
    pub fn member_at(&self, screen_pt: Point) -> Option<&FamilyMember> {
        hit::node_at_screen(&self.layout, &self.controller.viewport(), self.origin(), screen_pt).map(|n| &n.member)
    }

    // --- Internals ---

    fn relayout(&mut self) {
        self.layout = layout::compute(self.members.members());
        log::debug!(
            "engine: layout {} nodes, {} orphans, {} edges",
            self.layout.nodes.len(),
            self.layout.orphans.len(),
            self.layout.edges.len()
        );
    }

    fn persist(&self, store: &dyn Storage) {
        if let Err(e) = storage::save_members(store, self.members.members()) {
            log::warn!("engine: failed to persist family tree: {e}");
        }
    }

    fn clear_selection(&mut self) -> Vec<Action> {
        if self.selected.take().is_some() { vec![Action::SelectionChanged(None)] } else { Vec::new() }
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas
/// element, its 2D context, and the window's local storage.
#[cfg(feature = "browser")]
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    store: Box<dyn Storage>,
    pub core: EngineCore,
    dpr: f64,
}

#[cfg(feature = "browser")]
impl Engine {
    /// Create an engine bound to `canvas` and restore the stored tree.
    ///
    /// Falls back to in-memory storage when `localStorage` is unavailable.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;

        let store: Box<dyn Storage> = match storage::LocalStorage::open() {
            Ok(local) => Box::new(local),
            Err(e) => {
                log::warn!("engine: {e}; family tree will not survive a reload");
                Box::new(storage::MemoryStorage::new())
            }
        };

        let mut core = EngineCore::new();
        core.load_from(store.as_ref());
        Ok(Self { canvas, ctx, store, core, dpr: 1.0 })
    }

    // --- Delegated data inputs ---

    pub fn replace_members(&mut self, members: Vec<FamilyMember>) -> Vec<Action> {
        self.core.replace_members(members, self.store.as_ref())
    }

    pub fn merge_members(&mut self, members: Vec<FamilyMember>) -> Vec<Action> {
        self.core.merge_members(members, self.store.as_ref())
    }

    pub fn clear(&mut self) -> Vec<Action> {
        self.core.clear(self.store.as_ref())
    }

    // --- Viewport ---

    /// Resize the backing store for `width_css × height_css` at `dpr`.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        self.canvas.set_width(device_px(width_css * self.dpr));
        self.canvas.set_height(device_px(height_css * self.dpr));
        self.core.set_viewport_size(width_css, height_css)
    }

    // --- Render ---

    /// Draw the current state to the canvas. Failures are logged, never raised.
    pub fn render(&self) {
        if self.core.mode() != ViewMode::Visual {
            return;
        }
        let scene = crate::render::Scene {
            layout: self.core.layout(),
            viewport: self.core.viewport(),
            selected: self.core.selected_id(),
            width: self.core.viewport_width,
            height: self.core.viewport_height,
            dpr: self.dpr,
        };
        if let Err(e) = crate::render::draw(&self.ctx, &scene) {
            log::error!("engine: render failed: {e:?}");
        }
    }
}

#[cfg(feature = "browser")]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn device_px(v: f64) -> u32 {
    v.round().clamp(0.0, f64::from(u32::MAX)) as u32
}
