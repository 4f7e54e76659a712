//! Deterministic timeline layout with vertical collision avoidance.
//!
//! Every node is placed once, relative to its parent:
//! - `main` continues to the right of the parent
//! - `alternate` forks below and slightly to the right
//! - `merged` goes to the right and slightly up
//!
//! When the candidate spot is too close to an already placed node, the
//! candidate slides down in half-row steps until it is free. Placement is a
//! first-fit search along the y axis and uses no randomness.
//!
//! Positions are assigned lazily: a pass visits the tree breadth-first from the
//! root (children in creation order) and only touches nodes without a
//! position. Nodes whose parent chain does not currently reach the root are
//! deferred to a later pass. Once assigned, a position is only ever replaced by
//! a manual drag.

use std::collections::VecDeque;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::geometry::Point;
use crate::model::{BranchType, DialogueNode, NodeTable, ROOT_ID};

/// Upper limit on the candidates one placed node may block; configs needing
/// more are rejected by validation.
pub const MAX_BLOCKED_STEPS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal spacing unit `H`.
    pub horizontal_spacing: f32,
    /// Vertical spacing unit `V`.
    pub vertical_spacing: f32,
    /// Fixed scene position of the root node.
    pub root_anchor: Point,
    /// Two nodes collide when they are closer than this fraction of `H` and `V`.
    pub collision_fraction: f32,
    /// Downward step, as a fraction of `V`, applied while a candidate collides.
    pub displacement_fraction: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_spacing: 400.0,
            vertical_spacing: 300.0,
            root_anchor: Point::new(400.0, 300.0),
            collision_fraction: 0.8,
            displacement_fraction: 0.5,
        }
    }
}

impl LayoutConfig {
    /// Offset from the parent position for a given branch type.
    pub fn branch_offset(&self, branch: BranchType) -> Point {
        let h = self.horizontal_spacing;
        let v = self.vertical_spacing;
        match branch {
            BranchType::Main => Point::new(h, 0.0),
            BranchType::Alternate => Point::new(h * 0.5, v),
            BranchType::Merged => Point::new(h, -v * 0.3),
        }
    }

    pub fn collides(&self, a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < self.horizontal_spacing * self.collision_fraction
            && (a.y - b.y).abs() < self.vertical_spacing * self.collision_fraction
    }

    fn displacement_step(&self) -> f32 {
        self.vertical_spacing * self.displacement_fraction
    }

    /// How many consecutive candidates a single placed node can block, capped
    /// at [`MAX_BLOCKED_STEPS`].
    pub fn blocked_steps_per_node(&self) -> usize {
        let window = 2.0 * self.vertical_spacing * self.collision_fraction;
        // `as` saturates: infinity maps to usize::MAX, NaN to 0
        ((window / self.displacement_step()).ceil() as usize).clamp(1, MAX_BLOCKED_STEPS)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Position table
// ────────────────────────────────────────────────────────────────────────────

/// Scene position per node id, in assignment order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionTable {
    positions: IndexMap<String, Point>,
}

impl PositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> {
        self.positions.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn insert_new(&mut self, id: &str, p: Point) {
        self.positions.entry(id.to_string()).or_insert(p);
    }

    /// Replace a node's position. Reserved for manual placement.
    pub(crate) fn overwrite(&mut self, id: &str, p: Point) {
        self.positions.insert(id.to_string(), p);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Placement
// ────────────────────────────────────────────────────────────────────────────

/// Whether `candidate` collides with any placed node other than `exclude_id`.
pub fn is_position_occupied(
    candidate: Point,
    exclude_id: &str,
    positions: &PositionTable,
    cfg: &LayoutConfig,
) -> bool {
    positions
        .iter()
        .any(|(id, p)| id != exclude_id && cfg.collides(p, candidate))
}

/// Compute the position for `node`.
///
/// Returns `None` when the node is not the root and its parent has no position
/// yet; the caller retries on a later pass.
pub fn assign_position(
    node: &DialogueNode,
    positions: &PositionTable,
    cfg: &LayoutConfig,
) -> Option<Point> {
    if node.id == ROOT_ID {
        return Some(cfg.root_anchor);
    }
    let parent = positions.get(node.parent_id.as_deref()?)?;
    let mut candidate = parent + cfg.branch_offset(node.branch_type());

    let bound = positions
        .len()
        .saturating_mul(cfg.blocked_steps_per_node())
        .saturating_add(1);
    let mut steps = 0usize;
    while is_position_occupied(candidate, &node.id, positions, cfg) {
        if steps >= bound {
            warn!(node = %node.id, steps, "collision resolver hit its bound; keeping last candidate");
            break;
        }
        candidate.y += cfg.displacement_step();
        steps += 1;
        trace!(node = %node.id, y = candidate.y, "slide down to avoid overlap");
    }
    Some(candidate)
}

/// Outcome of one layout pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutReport {
    /// Nodes that received a position during this pass, in placement order.
    pub placed: Vec<String>,
    /// Nodes still without a position, to be retried on the next pass.
    pub deferred: Vec<String>,
}

/// Owns the position table for one visualization lifetime.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    cfg: LayoutConfig,
    positions: PositionTable,
}

impl LayoutEngine {
    pub fn new(cfg: LayoutConfig) -> Self {
        Self {
            cfg,
            positions: PositionTable::new(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.cfg
    }

    pub fn positions(&self) -> &PositionTable {
        &self.positions
    }

    pub(crate) fn positions_mut(&mut self) -> &mut PositionTable {
        &mut self.positions
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.positions.get(id)
    }

    /// Place every reachable node that has no position yet. Safe to call as
    /// often as the tree changes; existing positions are never recomputed.
    pub fn layout_pass(&mut self, nodes: &NodeTable) -> LayoutReport {
        let mut report = LayoutReport::default();
        let mut visited = 0usize;
        let mut queue: VecDeque<&str> = VecDeque::new();
        if nodes.contains_key(ROOT_ID) {
            queue.push_back(ROOT_ID);
        }
        while let Some(id) = queue.pop_front() {
            let Some(node) = nodes.get(id) else { continue };
            visited += 1;
            if !self.positions.contains(id) {
                match assign_position(node, &self.positions, &self.cfg) {
                    Some(p) => {
                        debug!(node = %id, x = p.x, y = p.y, "placed node");
                        self.positions.insert_new(id, p);
                        report.placed.push(id.to_string());
                    }
                    None => {
                        report.deferred.push(id.to_string());
                        continue;
                    }
                }
            }
            for child in children_in_order(nodes, node) {
                queue.push_back(child);
            }
            if visited > nodes.len() {
                break;
            }
        }

        for id in nodes.keys() {
            if !self.positions.contains(id) && !report.deferred.iter().any(|d| d == id) {
                report.deferred.push(id.clone());
            }
        }
        if !report.deferred.is_empty() {
            debug!(deferred = report.deferred.len(), "nodes waiting for a placed parent");
        }
        report
    }
}

/// Children of `node`, in creation order. Uses the materialized child list when
/// present and falls back to scanning `parent_id`.
fn children_in_order<'a>(nodes: &'a NodeTable, node: &'a DialogueNode) -> Vec<&'a str> {
    if !node.children.is_empty() {
        return node.children.iter().map(String::as_str).collect();
    }
    nodes
        .values()
        .filter(|n| n.parent_id.as_deref() == Some(node.id.as_str()))
        .map(|n| n.id.as_str())
        .collect()
}
