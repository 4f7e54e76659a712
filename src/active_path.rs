//! Ancestor chain of the current node, used for highlighting.

use indexmap::IndexSet;
use serde::Serialize;

use crate::model::NodeTable;

/// Node ids on the path from the current node up to the root, current first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivePath {
    ids: IndexSet<String>,
}

impl ActivePath {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// A connector is highlighted when both of its endpoints are on the path.
    pub fn is_connector_active(&self, parent_id: &str, child_id: &str) -> bool {
        self.contains(parent_id) && self.contains(child_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids from the current node towards the root.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

/// Walk `parent_id` links from `current_id` to the root.
///
/// Stops at a node without parent, at the first id missing from `nodes`, or at
/// an id seen before, so a corrupted chain still terminates.
pub fn compute_active_path(current_id: &str, nodes: &NodeTable) -> ActivePath {
    let mut ids = IndexSet::new();
    let mut cursor = nodes.get(current_id);
    while let Some(node) = cursor {
        if !ids.insert(node.id.clone()) {
            break;
        }
        cursor = node.parent_id.as_deref().and_then(|p| nodes.get(p));
    }
    ActivePath { ids }
}

/// Caches the active path and recomputes it from scratch whenever the current
/// node or the store revision changes.
#[derive(Debug, Clone, Default)]
pub struct ActivePathTracker {
    key: Option<(String, u64)>,
    path: ActivePath,
}

impl ActivePathTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> &ActivePath {
        &self.path
    }

    /// Returns `true` when the path was recomputed.
    pub fn refresh(&mut self, current_id: &str, nodes: &NodeTable, revision: u64) -> bool {
        let unchanged = matches!(&self.key, Some((id, rev)) if id == current_id && *rev == revision);
        if unchanged {
            return false;
        }
        self.path = compute_active_path(current_id, nodes);
        self.key = Some((current_id.to_string(), revision));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BranchType, DialogueNode};

    #[test]
    fn test_cycle_terminates() {
        let mut nodes = NodeTable::new();
        nodes.insert("a".into(), DialogueNode::new("a", "b", BranchType::Main, ""));
        nodes.insert("b".into(), DialogueNode::new("b", "a", BranchType::Main, ""));
        let path = compute_active_path("a", &nodes);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_unknown_current_is_empty() {
        let nodes = NodeTable::new();
        assert!(compute_active_path("nope", &nodes).is_empty());
    }
}
