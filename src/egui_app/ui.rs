#![cfg(feature = "egui")]

use eframe::egui::{
    self, Align2, Color32, CursorIcon, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Vec2,
};
use eframe::egui::epaint::CubicBezierShape;

use crate::geometry::Point;
use crate::gesture::{InputEvent, Key, Modifiers, ZoomDirection};
use crate::model::BranchType;
use crate::store::{DialogueTree, NodeStore};
use crate::timeline::{NodeView, Scene};
use crate::viewport::Viewport;

use super::geometry::{canvas_local, card_rect, hit_test, jump_button_rect};
use super::state::TimelineApp;

const GRID_COLOR: Color32 = Color32::from_rgb(229, 231, 235);
const CANVAS_BG: Color32 = Color32::from_rgb(249, 250, 251);
const ACTIVE_COLOR: Color32 = Color32::from_rgb(147, 51, 234);
const INACTIVE_COLOR: Color32 = Color32::from_rgb(203, 213, 225);
const CONTENT_PREVIEW_CHARS: usize = 160;
// Plain ASCII so egui's default fonts always have the glyphs
const ZOOM_OUT_LABEL: &str = "-";
const ZOOM_IN_LABEL: &str = "+";
const JUMP_LABEL: &str = ">>";

pub(crate) fn update(app: &mut TimelineApp, ctx: &egui::Context, _frame: &mut eframe::Frame) {
    let mut events: Vec<InputEvent> = Vec::new();
    let center = Point::new(app.canvas_size.x * 0.5, app.canvas_size.y * 0.5);

    egui::TopBottomPanel::top("top").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("The Garden of Forking Paths");
            ui.separator();
            // Zoom controls must not scale with zoom
            if ui.small_button(ZOOM_OUT_LABEL).clicked() {
                events.push(InputEvent::ZoomButton {
                    direction: ZoomDirection::Out,
                    anchor: center,
                });
            }
            ui.label(format!("{}%", app.view.viewport().zoom_percent()));
            if ui.small_button(ZOOM_IN_LABEL).clicked() {
                events.push(InputEvent::ZoomButton {
                    direction: ZoomDirection::In,
                    anchor: center,
                });
            }
            if ui.small_button("Reset").clicked() {
                events.push(InputEvent::KeyDown {
                    key: Key::Char('0'),
                    modifiers: Modifiers::CTRL,
                });
            }
            ui.separator();
            ui.label(format!("Current: {}", app.tree.current_node_id()));
            ui.label(format!("{} nodes", app.tree.len()));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.toggle_value(&mut app.show_prompt_panel, "System prompt");
            });
        });
    });

    if app.show_prompt_panel {
        egui::SidePanel::right("system_prompt")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.label("System prompt (root node)");
                let resp = ui.add(
                    egui::TextEdit::multiline(&mut app.prompt_draft)
                        .desired_width(f32::INFINITY)
                        .desired_rows(12),
                );
                if resp.changed() {
                    events.push(InputEvent::SystemPromptEdited(app.prompt_draft.clone()));
                }
            });
    }

    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            let (canvas, _resp) =
                ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
            app.canvas_size = canvas.size();

            app.view.sync(&app.tree);
            let scene = app.view.scene(&app.tree);
            collect_canvas_events(app, ui, canvas, &scene, &mut events);

            for ev in events.drain(..) {
                app.view.handle_event(ev, &mut app.tree);
            }

            let scene = app.view.scene(&app.tree);
            let painter = ui.painter_at(canvas);
            painter.rect_filled(canvas, 0.0, CANVAS_BG);
            paint_grid(&painter, canvas, &scene);
            paint_connectors(&painter, canvas, app.view.viewport(), &scene);
            for n in &scene.nodes {
                paint_node(&painter, canvas, app.view.viewport(), n, &app.tree);
            }

            if app.view.gestures().is_dragging_node() {
                ctx.set_cursor_icon(CursorIcon::Grabbing);
            } else if app.view.gestures().is_panning() {
                ctx.set_cursor_icon(CursorIcon::Grab);
            }
        });
}

/// Translate this frame's raw egui input into timeline input events.
fn collect_canvas_events(
    app: &mut TimelineApp,
    ui: &egui::Ui,
    canvas: Rect,
    scene: &Scene,
    events: &mut Vec<InputEvent>,
) {
    let typing = ui.ctx().wants_keyboard_input();
    let (hover, pressed, released, scroll_y, space_down, space_up, zero, ctrl, shift) =
        ui.input(|i| {
            (
                i.pointer.hover_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.raw_scroll_delta.y,
                i.key_pressed(egui::Key::Space),
                i.key_released(egui::Key::Space),
                i.key_pressed(egui::Key::Num0),
                i.modifiers.ctrl || i.modifiers.command,
                i.modifiers.shift,
            )
        });
    let modifiers = Modifiers { ctrl, shift };

    if !typing {
        if space_down {
            events.push(InputEvent::KeyDown {
                key: Key::Space,
                modifiers,
            });
        }
        if space_up {
            events.push(InputEvent::KeyUp {
                key: Key::Space,
                modifiers,
            });
        }
        if zero {
            events.push(InputEvent::KeyDown {
                key: Key::Char('0'),
                modifiers,
            });
        }
    }

    let inside = hover.filter(|p| canvas.contains(*p));
    match (app.last_hover, inside) {
        (Some(_), None) => {
            events.push(InputEvent::PointerLeave);
            app.last_hover = None;
            return;
        }
        (_, None) => return,
        _ => {}
    }
    let Some(abs) = inside else { return };
    let pos = canvas_local(canvas, abs);

    if app.last_hover != Some(abs) {
        events.push(InputEvent::PointerMove { pos });
    }
    app.last_hover = Some(abs);

    if scroll_y.abs() > 0.0 {
        // egui reports wheel-up as positive; wheel deltas are positive when zooming out
        events.push(InputEvent::Wheel {
            pos,
            delta_y: -scroll_y,
        });
    }
    if pressed {
        let hit = hit_test(canvas, app.view.viewport(), &scene.nodes, abs);
        events.push(InputEvent::PointerDown { pos, hit });
    }
    if released {
        events.push(InputEvent::PointerUp { pos });
    }
}

fn paint_grid(painter: &egui::Painter, canvas: Rect, scene: &Scene) {
    let cell = scene.grid.cell_size;
    if cell < 4.0 {
        return;
    }
    let stroke = Stroke::new(1.0, GRID_COLOR);
    let mut x = canvas.left() + scene.grid.offset.x.rem_euclid(cell);
    while x < canvas.right() {
        painter.line_segment(
            [Pos2::new(x, canvas.top()), Pos2::new(x, canvas.bottom())],
            stroke,
        );
        x += cell;
    }
    let mut y = canvas.top() + scene.grid.offset.y.rem_euclid(cell);
    while y < canvas.bottom() {
        painter.line_segment(
            [Pos2::new(canvas.left(), y), Pos2::new(canvas.right(), y)],
            stroke,
        );
        y += cell;
    }
}

fn paint_connectors(painter: &egui::Painter, canvas: Rect, vp: &Viewport, scene: &Scene) {
    let scale = vp.scale();
    for c in &scene.connectors {
        let from = card_rect(canvas, vp, c.start).right_center();
        let to = card_rect(canvas, vp, c.end).left_center();
        let bend = ((to.x - from.x).abs() * 0.5).max(40.0 * scale);
        let points = [
            from,
            from + Vec2::new(bend, 0.0),
            to - Vec2::new(bend, 0.0),
            to,
        ];
        let (color, width) = if c.active {
            (ACTIVE_COLOR, 3.0)
        } else {
            (INACTIVE_COLOR, 1.5)
        };
        let stroke = Stroke::new(width * scale.max(0.5), color);
        painter.add(CubicBezierShape::from_points_stroke(
            points,
            false,
            Color32::TRANSPARENT,
            stroke,
        ));
        if c.branch_type == BranchType::Merged {
            painter.circle_filled(to, 4.0 * scale, color);
        }
    }
}

fn branch_color(b: BranchType) -> Color32 {
    match b {
        BranchType::Main => Color32::from_rgb(59, 130, 246),
        BranchType::Alternate => Color32::from_rgb(245, 158, 11),
        BranchType::Merged => Color32::from_rgb(16, 185, 129),
    }
}

fn paint_node(
    painter: &egui::Painter,
    canvas: Rect,
    vp: &Viewport,
    n: &NodeView,
    tree: &DialogueTree,
) {
    let scale = vp.scale();
    let card = card_rect(canvas, vp, n.position);
    if !card.intersects(canvas) {
        return;
    }
    let radius = 8.0 * scale;
    let bg = if n.is_current {
        Color32::from_rgb(245, 243, 255)
    } else {
        Color32::WHITE
    };
    painter.rect_filled(card, radius, bg);
    let border = if n.is_current {
        Stroke::new(2.5 * scale.max(0.5), ACTIVE_COLOR)
    } else if n.on_active_path {
        Stroke::new(1.5 * scale.max(0.5), ACTIVE_COLOR)
    } else {
        Stroke::new(1.0, INACTIVE_COLOR)
    };
    painter.rect_stroke(card, radius, border, StrokeKind::Inside);

    let pad = 10.0 * scale;
    let header_font = FontId::proportional(12.0 * scale);
    let header = if n.is_root {
        "system prompt".to_string()
    } else {
        format!("{} · {}", n.id, n.branch_type)
    };
    let header_color = if n.is_root {
        Color32::from_rgb(107, 114, 128)
    } else {
        branch_color(n.branch_type)
    };
    painter.text(
        card.left_top() + Vec2::splat(pad),
        Align2::LEFT_TOP,
        header,
        header_font,
        header_color,
    );

    let jump = jump_button_rect(card, scale);
    let jump_bg = if n.explored {
        Color32::from_rgb(237, 233, 254)
    } else {
        Color32::from_rgb(243, 244, 246)
    };
    painter.rect_filled(jump, 4.0 * scale, jump_bg);
    painter.text(
        jump.center(),
        Align2::CENTER_CENTER,
        JUMP_LABEL,
        FontId::proportional(14.0 * scale),
        Color32::from_rgb(75, 85, 99),
    );

    // Preview text; keep tiny zoom levels readable by skipping text entirely
    if scale < 0.3 {
        return;
    }
    let preview = preview_text(&n.content);
    let body_font = FontId::proportional(13.0 * scale);
    let wrap = card.width() - 2.0 * pad;
    let galley = painter.layout(preview, body_font, Color32::from_rgb(31, 41, 55), wrap);
    painter.galley(
        card.left_top() + Vec2::new(pad, pad + 20.0 * scale),
        galley,
        Color32::BLACK,
    );

    let kids = tree.children_of(&n.id).len();
    if kids > 0 {
        painter.text(
            card.right_bottom() - Vec2::splat(pad),
            Align2::RIGHT_BOTTOM,
            format!("{} branch{}", kids, if kids == 1 { "" } else { "es" }),
            FontId::proportional(11.0 * scale),
            Color32::from_rgb(107, 114, 128),
        );
    }
}

fn preview_text(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() <= CONTENT_PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let mut s: String = trimmed.chars().take(CONTENT_PREVIEW_CHARS).collect();
    s.push('…');
    s
}
