#![cfg(feature = "egui")]

use eframe::egui::{Pos2, Rect, Vec2};

use crate::geometry::Point;
use crate::gesture::HitTarget;
use crate::timeline::NodeView;
use crate::viewport::Viewport;

/// Card size in scene units. Smaller than the layout's collision box so
/// automatically placed cards never overlap.
pub const CARD_SIZE: Vec2 = Vec2::new(280.0, 140.0);
/// Jump affordance in the card's top-right corner, scene units.
pub const JUMP_BUTTON_SIZE: f32 = 22.0;
const JUMP_BUTTON_MARGIN: f32 = 6.0;

pub fn to_pos2(p: Point) -> Pos2 {
    Pos2::new(p.x, p.y)
}

pub fn to_point(p: Pos2) -> Point {
    Point::new(p.x, p.y)
}

/// Absolute egui position → canvas-relative screen point.
pub fn canvas_local(canvas: Rect, p: Pos2) -> Point {
    Point::new(p.x - canvas.min.x, p.y - canvas.min.y)
}

/// Scene point → absolute egui position.
pub fn scene_to_abs(canvas: Rect, vp: &Viewport, p: Point) -> Pos2 {
    let s = vp.scene_to_screen(p);
    Pos2::new(canvas.min.x + s.x, canvas.min.y + s.y)
}

/// Card rectangle of a node positioned at `p`, in absolute egui coordinates.
pub fn card_rect(canvas: Rect, vp: &Viewport, p: Point) -> Rect {
    let min = scene_to_abs(canvas, vp, p);
    Rect::from_min_size(min, CARD_SIZE * vp.scale())
}

pub fn jump_button_rect(card: Rect, scale: f32) -> Rect {
    let size = JUMP_BUTTON_SIZE * scale;
    let margin = JUMP_BUTTON_MARGIN * scale;
    Rect::from_min_size(
        Pos2::new(card.right() - margin - size, card.top() + margin),
        Vec2::splat(size),
    )
}

/// Top-most node card (or its jump button) under `abs`. Later nodes are drawn
/// on top, so they win.
pub fn hit_test(canvas: Rect, vp: &Viewport, nodes: &[NodeView], abs: Pos2) -> Option<HitTarget> {
    nodes.iter().rev().find_map(|n| {
        let card = card_rect(canvas, vp, n.position);
        if !card.contains(abs) {
            return None;
        }
        if jump_button_rect(card, vp.scale()).contains(abs) {
            Some(HitTarget::JumpButton(n.id.clone()))
        } else {
            Some(HitTarget::Node(n.id.clone()))
        }
    })
}
