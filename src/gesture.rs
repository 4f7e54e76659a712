//! Pointer and keyboard gestures, mapped to timeline commands.
//!
//! [`GestureController`] is a small state machine. It never touches the
//! layout or the viewport itself; it only turns raw input into [`Command`]s,
//! which [`crate::timeline::TimelineView::apply`] executes. All positions in
//! events and commands are canvas-relative screen coordinates.
//!
//! Rules:
//! - pointer-down on empty canvas starts a pan; each move pans by the delta
//!   since the previous move
//! - pointer-down on a node arms a press; moving past the click slop turns it
//!   into a node drag, releasing before that is a click (navigate or jump)
//! - holding space pans on plain pointer moves, no button needed; a press
//!   while space is held pans even over a node
//! - ctrl+0 resets the view
//! - leaving the canvas ends any pan or drag exactly like a release, but never
//!   counts as a click

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Pointer travel (screen pixels) that turns a press on a node into a drag.
    pub click_slop: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self { click_slop: 3.0 }
    }
}

/// What the pointer landed on when it went down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    Node(String),
    /// The "jump to this timeline" affordance on a node card.
    JumpButton(String),
}

impl HitTarget {
    pub fn node_id(&self) -> &str {
        match self {
            HitTarget::Node(id) | HitTarget::JumpButton(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { pos: Point, hit: Option<HitTarget> },
    PointerMove { pos: Point },
    PointerUp { pos: Point },
    PointerLeave,
    Wheel { pos: Point, delta_y: f32 },
    KeyDown { key: Key, modifiers: Modifiers },
    KeyUp { key: Key, modifiers: Modifiers },
    ZoomButton { direction: ZoomDirection, anchor: Point },
    SystemPromptEdited(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Zoom { cursor: Point, wheel_delta: f32 },
    ZoomStep { direction: ZoomDirection, anchor: Point },
    PanBy { dx: f32, dy: f32 },
    ResetView,
    /// `grab` is where the pointer went down on the node.
    DragStart { node_id: String, grab: Point },
    DragMove { pointer: Point },
    DragEnd,
    Navigate(String),
    JumpToTimeline(String),
    UpdateSystemPrompt(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
enum PointerState {
    #[default]
    Idle,
    Panning {
        last: Point,
    },
    Pressed {
        target: HitTarget,
        origin: Point,
    },
    DraggingNode,
}

#[derive(Debug, Clone, Default)]
pub struct GestureController {
    cfg: GestureConfig,
    pointer: PointerState,
    pan_mode: bool,
    last_pointer: Option<Point>,
}

impl GestureController {
    pub fn new(cfg: GestureConfig) -> Self {
        Self {
            cfg,
            ..Default::default()
        }
    }

    /// True while the canvas follows the pointer (for a grab cursor).
    pub fn is_panning(&self) -> bool {
        self.pan_mode || matches!(self.pointer, PointerState::Panning { .. })
    }

    pub fn is_dragging_node(&self) -> bool {
        matches!(self.pointer, PointerState::DraggingNode)
    }

    pub fn handle(&mut self, event: InputEvent) -> Vec<Command> {
        trace!(?event, "gesture");
        match event {
            InputEvent::PointerDown { pos, hit } => {
                self.last_pointer = Some(pos);
                self.pointer = match hit {
                    // Space pan mode wins over node presses
                    _ if self.pan_mode => PointerState::Panning { last: pos },
                    None => PointerState::Panning { last: pos },
                    Some(target) => PointerState::Pressed {
                        target,
                        origin: pos,
                    },
                };
                Vec::new()
            }
            InputEvent::PointerMove { pos } => self.pointer_move(pos),
            InputEvent::PointerUp { .. } => self.pointer_release(true),
            InputEvent::PointerLeave => {
                self.last_pointer = None;
                self.pointer_release(false)
            }
            InputEvent::Wheel { pos, delta_y } => vec![Command::Zoom {
                cursor: pos,
                wheel_delta: delta_y,
            }],
            InputEvent::KeyDown { key, modifiers } => match key {
                Key::Space => {
                    self.pan_mode = true;
                    Vec::new()
                }
                Key::Char('0') if modifiers.ctrl => vec![Command::ResetView],
                Key::Char(_) => Vec::new(),
            },
            InputEvent::KeyUp { key, .. } => {
                if key == Key::Space {
                    self.pan_mode = false;
                }
                Vec::new()
            }
            InputEvent::ZoomButton { direction, anchor } => {
                vec![Command::ZoomStep { direction, anchor }]
            }
            InputEvent::SystemPromptEdited(content) => vec![Command::UpdateSystemPrompt(content)],
        }
    }

    fn pointer_move(&mut self, pos: Point) -> Vec<Command> {
        let prev = self.last_pointer;
        let mut out = Vec::new();
        match &mut self.pointer {
            PointerState::DraggingNode => {
                if pos.is_origin() {
                    // Spurious event from the backend; keep the last good pointer.
                    return out;
                }
                out.push(Command::DragMove { pointer: pos });
            }
            PointerState::Panning { last } => {
                let d = pos - *last;
                *last = pos;
                out.push(Command::PanBy { dx: d.x, dy: d.y });
            }
            PointerState::Pressed { target, origin } => {
                if pos.distance(*origin) > self.cfg.click_slop {
                    out.push(Command::DragStart {
                        node_id: target.node_id().to_string(),
                        grab: *origin,
                    });
                    out.push(Command::DragMove { pointer: pos });
                    self.pointer = PointerState::DraggingNode;
                }
            }
            PointerState::Idle => {
                if let (true, Some(last)) = (self.pan_mode, prev) {
                    let d = pos - last;
                    out.push(Command::PanBy { dx: d.x, dy: d.y });
                }
            }
        }
        self.last_pointer = Some(pos);
        out
    }

    fn pointer_release(&mut self, allow_click: bool) -> Vec<Command> {
        match std::mem::take(&mut self.pointer) {
            PointerState::DraggingNode => vec![Command::DragEnd],
            PointerState::Pressed { target, .. } if allow_click => match target {
                HitTarget::Node(id) => vec![Command::Navigate(id)],
                HitTarget::JumpButton(id) => vec![Command::JumpToTimeline(id)],
            },
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_wiggle_is_still_a_click() {
        let mut g = GestureController::default();
        g.handle(InputEvent::PointerDown {
            pos: Point::new(10.0, 10.0),
            hit: Some(HitTarget::Node("a".into())),
        });
        assert!(g.handle(InputEvent::PointerMove { pos: Point::new(11.0, 11.0) }).is_empty());
        let cmds = g.handle(InputEvent::PointerUp { pos: Point::new(11.0, 11.0) });
        assert_eq!(cmds, vec![Command::Navigate("a".into())]);
    }

    #[test]
    fn test_origin_move_ignored_mid_drag() {
        let mut g = GestureController::default();
        g.handle(InputEvent::PointerDown {
            pos: Point::new(10.0, 10.0),
            hit: Some(HitTarget::Node("a".into())),
        });
        g.handle(InputEvent::PointerMove { pos: Point::new(40.0, 10.0) });
        assert!(g.is_dragging_node());
        assert!(g.handle(InputEvent::PointerMove { pos: Point::ORIGIN }).is_empty());
    }

    #[test]
    fn test_space_pan_mode_pans_over_nodes() {
        let mut g = GestureController::default();
        g.handle(InputEvent::KeyDown { key: Key::Space, modifiers: Modifiers::NONE });
        g.handle(InputEvent::PointerDown {
            pos: Point::new(10.0, 10.0),
            hit: Some(HitTarget::Node("a".into())),
        });
        assert_eq!(
            g.handle(InputEvent::PointerMove { pos: Point::new(40.0, 20.0) }),
            vec![Command::PanBy { dx: 30.0, dy: 10.0 }]
        );
        assert!(!g.is_dragging_node());
        assert!(g.handle(InputEvent::PointerUp { pos: Point::new(40.0, 20.0) }).is_empty());
    }
}
