//! Plain 2D value types shared by the layout, viewport and drag modules.
//!
//! These stay free of any GUI crate so the engine can be driven headless; the
//! egui frontend converts to `Pos2` at the edge.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A point (or displacement) in either scene or screen space. Which space a
/// value lives in is determined by the API that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Exactly `(0, 0)`. Some input backends report this spuriously mid-drag.
    pub fn is_origin(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn distance(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}
