//! The timeline view: layout, viewport, active path and drag state for one
//! visualization lifetime.
//!
//! A [`TimelineView`] starts empty and is discarded with the visualization.
//! Call [`TimelineView::sync`] whenever the store may have changed, feed input
//! through [`TimelineView::handle_event`], and draw from [`TimelineView::scene`].

use serde::Serialize;
use tracing::{debug, warn};

use crate::active_path::{ActivePath, ActivePathTracker};
use crate::config::TimelineConfig;
use crate::drag::DragController;
use crate::geometry::Point;
use crate::gesture::{Command, GestureController, InputEvent, ZoomDirection};
use crate::layout::{LayoutEngine, LayoutReport, PositionTable};
use crate::model::{BranchType, ROOT_ID};
use crate::store::NodeStore;
use crate::viewport::{GridSpec, SceneTransform, Viewport};

/// A node as the renderer needs it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: String,
    pub position: Point,
    pub branch_type: BranchType,
    pub content: String,
    pub is_root: bool,
    pub is_current: bool,
    pub explored: bool,
    pub on_active_path: bool,
}

/// Parent → child link, endpoints in scene coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub parent_id: String,
    pub child_id: String,
    pub start: Point,
    pub end: Point,
    pub branch_type: BranchType,
    pub active: bool,
}

/// Everything needed to draw one frame. Nodes without a position yet are left
/// out, as are connectors touching them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub nodes: Vec<NodeView>,
    pub connectors: Vec<Connector>,
    pub active_path: Vec<String>,
    pub transform: SceneTransform,
    pub grid: GridSpec,
    pub zoom_percent: i32,
}

#[derive(Debug, Clone, Default)]
pub struct TimelineView {
    layout: LayoutEngine,
    viewport: Viewport,
    tracker: ActivePathTracker,
    drag: DragController,
    gestures: GestureController,
}

impl TimelineView {
    pub fn new(cfg: TimelineConfig) -> Self {
        Self {
            layout: LayoutEngine::new(cfg.layout),
            viewport: Viewport::new(cfg.viewport),
            tracker: ActivePathTracker::new(),
            drag: DragController::new(),
            gestures: GestureController::new(cfg.gesture),
        }
    }

    pub fn positions(&self) -> &PositionTable {
        self.layout.positions()
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.layout.position(id)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn active_path(&self) -> &ActivePath {
        self.tracker.path()
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    /// Place new nodes and refresh the active path.
    pub fn sync<S: NodeStore + ?Sized>(&mut self, store: &S) -> LayoutReport {
        let report = self.layout.layout_pass(store.nodes());
        if self
            .tracker
            .refresh(store.current_node_id(), store.nodes(), store.revision())
        {
            debug!(current = %store.current_node_id(), len = self.tracker.path().len(), "active path recomputed");
        }
        report
    }

    /// Map an input event to commands, apply them, then sync.
    pub fn handle_event<S: NodeStore + ?Sized>(&mut self, event: InputEvent, store: &mut S) {
        for cmd in self.gestures.handle(event) {
            self.apply(cmd, store);
        }
        self.sync(store);
    }

    pub fn apply<S: NodeStore + ?Sized>(&mut self, cmd: Command, store: &mut S) {
        match cmd {
            Command::Zoom {
                cursor,
                wheel_delta,
            } => self.viewport.zoom(cursor, wheel_delta),
            Command::ZoomStep { direction, anchor } => match direction {
                ZoomDirection::In => self.viewport.zoom_in(anchor),
                ZoomDirection::Out => self.viewport.zoom_out(anchor),
            },
            Command::PanBy { dx, dy } => self.viewport.pan_by(dx, dy),
            Command::ResetView => self.viewport.reset(),
            Command::DragStart { node_id, grab } => match self.layout.position(&node_id) {
                Some(origin) => {
                    let grab_scene = self.viewport.screen_to_scene(grab);
                    self.drag.drag_start(&node_id, grab_scene, origin);
                }
                None => warn!(node = %node_id, "cannot drag a node that has no position"),
            },
            Command::DragMove { pointer } => {
                // Some backends report (0, 0) while the pointer is captured
                if pointer.is_origin() {
                    return;
                }
                let Some(grab_offset) = self.drag.active().map(|s| s.grab_offset) else {
                    return;
                };
                let cursor = self.viewport.screen_to_scene(pointer) - grab_offset;
                self.drag.drag_move(cursor, self.layout.positions_mut());
            }
            Command::DragEnd => {
                self.drag.drag_end();
            }
            Command::Navigate(id) => {
                if let Err(err) = store.navigate(&id) {
                    warn!(%err, "navigate rejected");
                }
            }
            Command::JumpToTimeline(id) => {
                if let Err(err) = store.jump_to_timeline(&id) {
                    warn!(%err, "jump to timeline rejected");
                }
            }
            Command::UpdateSystemPrompt(content) => store.update_system_prompt(&content),
        }
    }

    /// Snapshot for rendering. The active path reflects the last `sync`.
    pub fn scene<S: NodeStore + ?Sized>(&self, store: &S) -> Scene {
        let path = self.tracker.path();
        let current = store.current_node_id();
        let explored = store.explored_branches();
        let nodes = store.nodes();

        let node_views = nodes
            .values()
            .filter_map(|n| {
                let position = self.layout.position(&n.id)?;
                Some(NodeView {
                    id: n.id.clone(),
                    position,
                    branch_type: n.branch_type(),
                    content: n.content.clone(),
                    is_root: n.id == ROOT_ID,
                    is_current: n.id == current,
                    explored: explored.contains(&n.id),
                    on_active_path: path.contains(&n.id),
                })
            })
            .collect();

        let connectors = nodes
            .values()
            .filter_map(|n| {
                let parent_id = n.parent_id.as_deref()?;
                let start = self.layout.position(parent_id)?;
                let end = self.layout.position(&n.id)?;
                Some(Connector {
                    parent_id: parent_id.to_string(),
                    child_id: n.id.clone(),
                    start,
                    end,
                    branch_type: n.branch_type(),
                    active: path.is_connector_active(parent_id, &n.id),
                })
            })
            .collect();

        Scene {
            nodes: node_views,
            connectors,
            active_path: path.iter().map(str::to_string).collect(),
            transform: self.viewport.transform(),
            grid: self.viewport.grid(),
            zoom_percent: self.viewport.zoom_percent(),
        }
    }
}
