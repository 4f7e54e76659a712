//! Pan/zoom state for the timeline canvas.
//!
//! The scene is drawn with `translate(offset) · scale(scale)` around the
//! canvas' top-left corner, so a scene point `p` lands on screen at
//! `p · scale + offset`. Zooming keeps the scene point under the anchor (the
//! cursor for wheel zoom) fixed on screen.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Scale change per wheel unit.
    pub zoom_sensitivity: f32,
    /// Multiplier applied by the zoom-in button (zoom-out divides by it).
    pub zoom_step: f32,
    /// Background grid cell size at scale 1.
    pub grid_cell: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 3.0,
            zoom_sensitivity: 0.001,
            zoom_step: 1.2,
            grid_cell: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// Transform applied to the node and connector layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneTransform {
    pub translate: Point,
    pub scale: f32,
}

/// Background grid: translated with the scene but never scaled around the
/// origin, only its cell size follows the zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub cell_size: f32,
    pub offset: Point,
}

#[derive(Debug, Clone, Default)]
pub struct Viewport {
    cfg: ViewportConfig,
    state: ViewportState,
}

impl Viewport {
    pub fn new(cfg: ViewportConfig) -> Self {
        Self {
            cfg,
            state: ViewportState::default(),
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn scale(&self) -> f32 {
        self.state.scale
    }

    pub fn offset(&self) -> Point {
        Point::new(self.state.offset_x, self.state.offset_y)
    }

    fn clamp_scale(&self, s: f32) -> f32 {
        if s.is_nan() {
            return self.state.scale;
        }
        // min/max rather than clamp: an unvalidated config with min > max must not panic
        s.max(self.cfg.min_scale).min(self.cfg.max_scale)
    }

    /// Rescale to `new_scale` (clamped) while keeping `anchor` fixed on screen.
    pub fn zoom_to(&mut self, new_scale: f32, anchor: Point) {
        let old = self.state.scale;
        let new = self.clamp_scale(new_scale);
        if new == old {
            return;
        }
        let ratio = new / old;
        self.state.offset_x = anchor.x - (anchor.x - self.state.offset_x) * ratio;
        self.state.offset_y = anchor.y - (anchor.y - self.state.offset_y) * ratio;
        self.state.scale = new;
    }

    /// Wheel zoom centered at the cursor (screen space). Negative deltas zoom in.
    pub fn zoom(&mut self, cursor: Point, wheel_delta: f32) {
        let candidate = self.state.scale * (1.0 + (-wheel_delta) * self.cfg.zoom_sensitivity);
        self.zoom_to(candidate, cursor);
    }

    /// Multiply the scale by `factor`, anchored at a screen point.
    pub fn zoom_step(&mut self, factor: f32, anchor: Point) {
        self.zoom_to(self.state.scale * factor, anchor);
    }

    pub fn zoom_in(&mut self, anchor: Point) {
        self.zoom_step(self.cfg.zoom_step, anchor);
    }

    pub fn zoom_out(&mut self, anchor: Point) {
        self.zoom_step(1.0 / self.cfg.zoom_step, anchor);
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.state.offset_x += dx;
        self.state.offset_y += dy;
    }

    pub fn reset(&mut self) {
        debug!("viewport reset");
        self.state = ViewportState::default();
    }

    pub fn scene_to_screen(&self, p: Point) -> Point {
        Point::new(
            p.x * self.state.scale + self.state.offset_x,
            p.y * self.state.scale + self.state.offset_y,
        )
    }

    pub fn screen_to_scene(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.state.offset_x) / self.state.scale,
            (p.y - self.state.offset_y) / self.state.scale,
        )
    }

    pub fn transform(&self) -> SceneTransform {
        SceneTransform {
            translate: self.offset(),
            scale: self.state.scale,
        }
    }

    pub fn grid(&self) -> GridSpec {
        GridSpec {
            cell_size: self.cfg.grid_cell * self.state.scale,
            offset: self.offset(),
        }
    }

    /// Current zoom level for display, e.g. `120` for 120%.
    pub fn zoom_percent(&self) -> i32 {
        (self.state.scale * 100.0).round() as i32
    }
}
