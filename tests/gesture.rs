use forking_paths::geometry::Point;
use forking_paths::gesture::{
    Command, GestureConfig, GestureController, HitTarget, InputEvent, Key, Modifiers,
    ZoomDirection,
};

fn down(x: f32, y: f32, hit: Option<HitTarget>) -> InputEvent {
    InputEvent::PointerDown { pos: Point::new(x, y), hit }
}

fn mv(x: f32, y: f32) -> InputEvent {
    InputEvent::PointerMove { pos: Point::new(x, y) }
}

fn up(x: f32, y: f32) -> InputEvent {
    InputEvent::PointerUp { pos: Point::new(x, y) }
}

#[test]
fn canvas_drag_pans_by_incremental_deltas() {
    let mut g = GestureController::default();
    assert!(g.handle(down(100.0, 100.0, None)).is_empty());
    assert!(g.is_panning());
    assert_eq!(g.handle(mv(110.0, 95.0)), vec![Command::PanBy { dx: 10.0, dy: -5.0 }]);
    assert_eq!(g.handle(mv(130.0, 95.0)), vec![Command::PanBy { dx: 20.0, dy: 0.0 }]);
    assert!(g.handle(up(130.0, 95.0)).is_empty());
    assert!(!g.is_panning());
    assert!(g.handle(mv(200.0, 200.0)).is_empty());
}

#[test]
fn pointer_leave_ends_pan() {
    let mut g = GestureController::default();
    g.handle(down(0.5, 0.5, None));
    g.handle(InputEvent::PointerLeave);
    assert!(!g.is_panning());
    assert!(g.handle(mv(50.0, 50.0)).is_empty());
}

#[test]
fn space_toggles_persistent_pan_mode() {
    let mut g = GestureController::default();
    g.handle(mv(10.0, 10.0));
    g.handle(InputEvent::KeyDown { key: Key::Space, modifiers: Modifiers::NONE });
    assert!(g.is_panning());
    assert_eq!(g.handle(mv(15.0, 30.0)), vec![Command::PanBy { dx: 5.0, dy: 20.0 }]);
    g.handle(InputEvent::KeyUp { key: Key::Space, modifiers: Modifiers::NONE });
    assert!(!g.is_panning());
    assert!(g.handle(mv(40.0, 40.0)).is_empty());
}

#[test]
fn ctrl_zero_resets_view() {
    let mut g = GestureController::default();
    assert_eq!(
        g.handle(InputEvent::KeyDown { key: Key::Char('0'), modifiers: Modifiers::CTRL }),
        vec![Command::ResetView]
    );
    assert!(g
        .handle(InputEvent::KeyDown { key: Key::Char('0'), modifiers: Modifiers::NONE })
        .is_empty());
}

#[test]
fn click_navigates_and_jump_button_jumps() {
    let mut g = GestureController::default();
    g.handle(down(5.0, 5.0, Some(HitTarget::Node("a".into()))));
    assert_eq!(g.handle(up(5.0, 5.0)), vec![Command::Navigate("a".into())]);

    g.handle(down(5.0, 5.0, Some(HitTarget::JumpButton("b".into()))));
    assert_eq!(g.handle(up(6.0, 5.0)), vec![Command::JumpToTimeline("b".into())]);
}

#[test]
fn moving_a_pressed_node_starts_a_drag() {
    let mut g = GestureController::new(GestureConfig { click_slop: 3.0 });
    g.handle(down(100.0, 100.0, Some(HitTarget::Node("a".into()))));
    let cmds = g.handle(mv(120.0, 100.0));
    assert_eq!(
        cmds,
        vec![
            Command::DragStart { node_id: "a".into(), grab: Point::new(100.0, 100.0) },
            Command::DragMove { pointer: Point::new(120.0, 100.0) },
        ]
    );
    assert!(g.is_dragging_node());
    assert_eq!(
        g.handle(mv(130.0, 110.0)),
        vec![Command::DragMove { pointer: Point::new(130.0, 110.0) }]
    );
    // Releasing after a drag is not a click
    assert_eq!(g.handle(up(130.0, 110.0)), vec![Command::DragEnd]);
    assert!(!g.is_dragging_node());
}

#[test]
fn leaving_the_canvas_ends_a_drag_without_navigating() {
    let mut g = GestureController::default();
    g.handle(down(100.0, 100.0, Some(HitTarget::Node("a".into()))));
    g.handle(mv(150.0, 100.0));
    assert_eq!(g.handle(InputEvent::PointerLeave), vec![Command::DragEnd]);

    g.handle(down(100.0, 100.0, Some(HitTarget::Node("a".into()))));
    assert!(g.handle(InputEvent::PointerLeave).is_empty());
    assert!(g.handle(up(100.0, 100.0)).is_empty());
}

#[test]
fn degenerate_pointer_is_dropped_during_drag() {
    let mut g = GestureController::default();
    g.handle(down(100.0, 100.0, Some(HitTarget::Node("a".into()))));
    g.handle(mv(150.0, 100.0));
    assert!(g.handle(mv(0.0, 0.0)).is_empty());
    assert_eq!(
        g.handle(mv(160.0, 100.0)),
        vec![Command::DragMove { pointer: Point::new(160.0, 100.0) }]
    );
}

#[test]
fn wheel_zoom_buttons_and_prompt_edits_pass_through() {
    let mut g = GestureController::default();
    assert_eq!(
        g.handle(InputEvent::Wheel { pos: Point::new(3.0, 4.0), delta_y: -120.0 }),
        vec![Command::Zoom { cursor: Point::new(3.0, 4.0), wheel_delta: -120.0 }]
    );
    assert_eq!(
        g.handle(InputEvent::ZoomButton { direction: ZoomDirection::Out, anchor: Point::ORIGIN }),
        vec![Command::ZoomStep { direction: ZoomDirection::Out, anchor: Point::ORIGIN }]
    );
    assert_eq!(
        g.handle(InputEvent::SystemPromptEdited("be brief".into())),
        vec![Command::UpdateSystemPrompt("be brief".into())]
    );
}
