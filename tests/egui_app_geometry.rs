#![cfg(feature = "egui")]

use eframe::egui::{Pos2, Rect, Vec2};
use forking_paths::egui_app::{CARD_SIZE, card_rect, hit_test, jump_button_rect, to_pos2};
use forking_paths::geometry::Point;
use forking_paths::gesture::HitTarget;
use forking_paths::model::BranchType;
use forking_paths::timeline::NodeView;
use forking_paths::viewport::{Viewport, ViewportConfig};

fn node(id: &str, x: f32, y: f32) -> NodeView {
    NodeView {
        id: id.to_string(),
        position: Point::new(x, y),
        branch_type: BranchType::Main,
        content: String::new(),
        is_root: false,
        is_current: false,
        explored: false,
        on_active_path: false,
    }
}

fn canvas() -> Rect {
    Rect::from_min_size(Pos2::new(50.0, 20.0), Vec2::new(1200.0, 800.0))
}

#[test]
fn card_follows_viewport() {
    let mut vp = Viewport::new(ViewportConfig::default());
    vp.pan_by(10.0, 5.0);
    vp.zoom_to(2.0, Point::new(10.0, 5.0));
    let card = card_rect(canvas(), &vp, Point::new(100.0, 100.0));
    assert_eq!(card.min, Pos2::new(50.0 + 210.0, 20.0 + 205.0));
    assert_eq!(card.size(), CARD_SIZE * 2.0);
}

#[test]
fn hit_test_prefers_jump_button_and_top_card() {
    let vp = Viewport::new(ViewportConfig::default());
    let nodes = vec![node("under", 100.0, 100.0), node("over", 150.0, 120.0)];

    let card = card_rect(canvas(), &vp, nodes[1].position);
    let jump = jump_button_rect(card, vp.scale());
    assert_eq!(
        hit_test(canvas(), &vp, &nodes, jump.center()),
        Some(HitTarget::JumpButton("over".into()))
    );

    let overlap = to_pos2(Point::new(50.0 + 200.0, 20.0 + 200.0));
    assert_eq!(
        hit_test(canvas(), &vp, &nodes, overlap),
        Some(HitTarget::Node("over".into()))
    );
    let only_under = to_pos2(Point::new(50.0 + 110.0, 20.0 + 110.0));
    assert_eq!(
        hit_test(canvas(), &vp, &nodes, only_under),
        Some(HitTarget::Node("under".into()))
    );
    assert_eq!(hit_test(canvas(), &vp, &nodes, Pos2::new(10.0, 10.0)), None);
}
