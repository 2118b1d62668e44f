//! Rendering: draws the family-tree scene to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives a read-only [`Scene`] and produces pixels; it does not mutate
//! any application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{NODE_HEIGHT, NODE_WIDTH};
use crate::layout::{Layout, LayoutEdge, LayoutNode};
use crate::viewport::Viewport;

const BACKGROUND: &str = "#EBE7DE";
const CARD_FILL: &str = "#F5F2EB";
const CARD_BORDER: &str = "#D6D1C7";
const CARD_BORDER_SELECTED: &str = "#2C2A26";
const INK: &str = "#2C2A26";
const MUTED: &str = "#A8A29E";
const SUBTLE: &str = "#5D5A53";
const EDGE_STROKE: &str = "rgba(168, 162, 158, 0.6)";

const CARD_RADIUS: f64 = 16.0;
const CARD_PADDING: f64 = 20.0;
const BADGE_RADIUS: f64 = 16.0;

/// Orphan outline dash segment length in world units.
const ORPHAN_DASH: f64 = 6.0;

/// Everything needed to paint one frame.
pub struct Scene<'a> {
    pub layout: &'a Layout,
    pub viewport: Viewport,
    /// Id of the member whose card is highlighted.
    pub selected: Option<&'a str>,
    /// Canvas size in CSS pixels.
    pub width: f64,
    pub height: f64,
    /// Device pixel ratio.
    pub dpr: f64,
}

/// Draw the full scene: background, connectors, then cards.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, scene: &Scene<'_>) -> Result<(), JsValue> {
    let vp = scene.viewport;

    // Layer 1: background in screen space.
    ctx.set_transform(scene.dpr, 0.0, 0.0, scene.dpr, 0.0, 0.0)?;
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, scene.width, scene.height);

    // World origin sits at the top-center of the canvas, then pan and zoom.
    ctx.translate(vp.x + scene.width / 2.0, vp.y)?;
    ctx.scale(vp.scale, vp.scale)?;

    // Layer 2: connectors beneath the cards.
    ctx.save();
    ctx.set_stroke_style_str(EDGE_STROKE);
    ctx.set_line_width(2.0);
    for edge in &scene.layout.edges {
        draw_edge(ctx, edge);
    }
    ctx.restore();

    // Layer 3: cards, tree rows first, orphans last.
    for node in scene.layout.all_nodes() {
        let selected = scene.selected == Some(node.member.id.as_str());
        draw_card(ctx, node, selected, node.generation.is_none())?;
    }

    Ok(())
}

// =============================================================
// Connectors
// =============================================================

fn draw_edge(ctx: &CanvasRenderingContext2d, edge: &LayoutEdge) {
    let (c1, c2) = edge.control_points();
    ctx.begin_path();
    ctx.move_to(edge.x1, edge.y1);
    ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, edge.x2, edge.y2);
    ctx.stroke();
}

// =============================================================
// Cards
// =============================================================

fn draw_card(ctx: &CanvasRenderingContext2d, node: &LayoutNode, selected: bool, orphan: bool) -> Result<(), JsValue> {
    ctx.save();
    ctx.translate(node.x, node.y)?;

    rounded_rect(ctx, 0.0, 0.0, NODE_WIDTH, NODE_HEIGHT, CARD_RADIUS)?;
    ctx.set_fill_style_str(CARD_FILL);
    ctx.fill();

    if orphan {
        set_dash(ctx, &[ORPHAN_DASH, ORPHAN_DASH])?;
    }
    ctx.set_stroke_style_str(if selected { CARD_BORDER_SELECTED } else { CARD_BORDER });
    ctx.set_line_width(if selected { 2.5 } else { 1.0 });
    ctx.stroke();
    set_dash(ctx, &[])?;

    draw_badge(ctx, node)?;
    draw_card_text(ctx, node);

    ctx.restore();
    Ok(())
}

/// Monogram circle straddling the card's top edge.
fn draw_badge(ctx: &CanvasRenderingContext2d, node: &LayoutNode) -> Result<(), JsValue> {
    let cx = NODE_WIDTH / 2.0;
    ctx.begin_path();
    ctx.arc(cx, 0.0, BADGE_RADIUS, 0.0, 2.0 * PI)?;
    ctx.set_fill_style_str(INK);
    ctx.fill();

    let initial = node.member.initial().map(String::from).unwrap_or_default();
    ctx.set_fill_style_str("#FFFFFF");
    ctx.set_font("bold 10px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text(&initial, cx, 0.0)?;
    Ok(())
}

fn draw_card_text(ctx: &CanvasRenderingContext2d, node: &LayoutNode) {
    let cx = NODE_WIDTH / 2.0;
    let max_w = NODE_WIDTH - 2.0 * CARD_PADDING;
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");

    ctx.set_font("bold 18px serif");
    ctx.set_fill_style_str(INK);
    let name = fit_text_with_ellipsis(ctx, &node.member.name, max_w);
    fill_text(ctx, &name, cx, 38.0);

    // Divider.
    ctx.set_fill_style_str(CARD_BORDER);
    ctx.fill_rect(CARD_PADDING, 56.0, max_w, 1.0);

    ctx.set_font("10px sans-serif");
    ctx.set_fill_style_str(MUTED);
    let born = node.member.birth_date.as_deref().unwrap_or("?").to_uppercase();
    fill_text(ctx, &fit_text_with_ellipsis(ctx, &born, max_w), cx, 74.0);

    if let Some(place) = node.member.birth_place.as_deref() {
        ctx.set_fill_style_str(SUBTLE);
        fill_text(ctx, &fit_text_with_ellipsis(ctx, place, max_w), cx, 92.0);
    }
}

fn fill_text(ctx: &CanvasRenderingContext2d, text: &str, x: f64, y: f64) {
    if let Err(e) = ctx.fill_text(text, x, y) {
        log::debug!("render: fill_text failed: {e:?}");
    }
}

// =============================================================
// Text
// =============================================================

fn fit_text_with_ellipsis(ctx: &CanvasRenderingContext2d, text: &str, max_w: f64) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if measured_text_width(ctx, trimmed) <= max_w {
        return trimmed.to_owned();
    }

    let ellipsis = "...";
    let mut chars: Vec<char> = trimmed.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate = format!("{}{}", chars.iter().collect::<String>().trim_end(), ellipsis);
        if measured_text_width(ctx, &candidate) <= max_w {
            return candidate;
        }
    }
    ellipsis.to_owned()
}

fn measured_text_width(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
    match ctx.measure_text(text) {
        Ok(metrics) => metrics.width(),
        Err(_) => f64::INFINITY,
    }
}

// =============================================================
// Helpers
// =============================================================

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.arc_to(x + w, y, x + w, y + r, r)?;
    ctx.line_to(x + w, y + h - r);
    ctx.arc_to(x + w, y + h, x + w - r, y + h, r)?;
    ctx.line_to(x + r, y + h);
    ctx.arc_to(x, y + h, x, y + h - r, r)?;
    ctx.line_to(x, y + r);
    ctx.arc_to(x, y, x + r, y, r)?;
    ctx.close_path();
    Ok(())
}

fn set_dash(ctx: &CanvasRenderingContext2d, segments: &[f64]) -> Result<(), JsValue> {
    let dash_array = js_sys::Array::new();
    for s in segments {
        dash_array.push(&(*s).into());
    }
    ctx.set_line_dash(&dash_array)
}
