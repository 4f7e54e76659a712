//! Manual repositioning of a single node.
//!
//! A drag writes straight into the layout's position table. The result is never
//! snapped back or pushed through collision avoidance: manual placement wins.
//! Starting a new drag while one is active replaces it; the earlier node keeps
//! the last position it was moved to.

use tracing::debug;

use crate::geometry::Point;
use crate::layout::PositionTable;

#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub node_id: String,
    /// Grab point minus the node's origin, in scene units.
    pub grab_offset: Point,
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    active: Option<DragState>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&DragState> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn drag_start(&mut self, node_id: &str, grab_point: Point, node_origin: Point) {
        if let Some(prev) = self.active.take() {
            debug!(node = %prev.node_id, "drag replaced by a new drag");
        }
        debug!(node = %node_id, "drag start");
        self.active = Some(DragState {
            node_id: node_id.to_string(),
            grab_offset: grab_point - node_origin,
        });
    }

    /// Move the dragged node to `cursor` (scene space, grab offset already
    /// applied). Returns `false` when no drag is active. Spurious `(0, 0)`
    /// pointer events are screen-space and are dropped before this point.
    pub fn drag_move(&mut self, cursor: Point, positions: &mut PositionTable) -> bool {
        let Some(state) = &self.active else {
            return false;
        };
        positions.overwrite(&state.node_id, cursor);
        true
    }

    pub fn drag_end(&mut self) -> Option<DragState> {
        let ended = self.active.take();
        if let Some(s) = &ended {
            debug!(node = %s.node_id, "drag end");
        }
        ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grab_offset_recorded() {
        let mut d = DragController::new();
        d.drag_start("a", Point::new(110.0, 220.0), Point::new(100.0, 200.0));
        assert_eq!(d.active().unwrap().grab_offset, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_move_without_drag_is_noop() {
        let mut d = DragController::new();
        let mut positions = PositionTable::new();
        assert!(!d.drag_move(Point::new(5.0, 5.0), &mut positions));
        assert!(positions.is_empty());
    }

    #[test]
    fn test_scene_origin_is_a_valid_target() {
        let mut d = DragController::new();
        let mut positions = PositionTable::new();
        positions.overwrite("a", Point::new(50.0, 60.0));
        d.drag_start("a", Point::new(50.0, 60.0), Point::new(50.0, 60.0));
        assert!(d.drag_move(Point::ORIGIN, &mut positions));
        assert_eq!(positions.get("a"), Some(Point::ORIGIN));
    }

    #[test]
    fn test_new_drag_replaces_active() {
        let mut d = DragController::new();
        d.drag_start("a", Point::ORIGIN, Point::ORIGIN);
        d.drag_start("b", Point::ORIGIN, Point::ORIGIN);
        assert_eq!(d.active().unwrap().node_id, "b");
        assert_eq!(d.drag_end().unwrap().node_id, "b");
        assert!(!d.is_dragging());
    }
}
