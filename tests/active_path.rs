use std::collections::BTreeSet;

use forking_paths::active_path::{ActivePathTracker, compute_active_path};
use forking_paths::model::{BranchType, DialogueNode, NodeTable, ROOT_ID};
use forking_paths::store::{DialogueTree, NodeStore};

fn chain() -> DialogueTree {
    let mut t = DialogueTree::new("sys");
    t.insert(DialogueNode::new("a", ROOT_ID, BranchType::Main, "")).unwrap();
    t.insert(DialogueNode::new("b", "a", BranchType::Main, "")).unwrap();
    t.insert(DialogueNode::new("c", "b", BranchType::Alternate, "")).unwrap();
    t.insert(DialogueNode::new("d", "a", BranchType::Alternate, "")).unwrap();
    t
}

fn ids(path: &forking_paths::active_path::ActivePath) -> BTreeSet<String> {
    path.iter().map(str::to_string).collect()
}

#[test]
fn path_from_leaf_to_root() {
    let t = chain();
    let path = compute_active_path("c", t.nodes());
    let expected: BTreeSet<String> = ["root", "a", "b", "c"].iter().map(|s| s.to_string()).collect();
    assert_eq!(ids(&path), expected);
    assert_eq!(path.iter().collect::<Vec<_>>(), vec!["c", "b", "a", "root"]);

    let path = compute_active_path("a", t.nodes());
    let expected: BTreeSet<String> = ["root", "a"].iter().map(|s| s.to_string()).collect();
    assert_eq!(ids(&path), expected);
}

#[test]
fn connector_activity_needs_both_endpoints() {
    let t = chain();
    let path = compute_active_path("c", t.nodes());
    assert!(path.is_connector_active("b", "c"));
    assert!(path.is_connector_active(ROOT_ID, "a"));
    assert!(!path.is_connector_active("a", "d"));
}

#[test]
fn missing_parent_stops_the_walk() {
    let mut nodes = NodeTable::new();
    nodes.insert("x".into(), DialogueNode::new("x", "gone", BranchType::Main, ""));
    nodes.insert("y".into(), DialogueNode::new("y", "x", BranchType::Main, ""));
    let path = compute_active_path("y", &nodes);
    assert_eq!(path.iter().collect::<Vec<_>>(), vec!["y", "x"]);
}

#[test]
fn tracker_recomputes_on_navigation_and_tree_changes() {
    let mut t = chain();
    let mut tracker = ActivePathTracker::new();
    assert!(tracker.refresh(t.current_node_id(), t.nodes(), t.revision()));
    assert_eq!(tracker.path().len(), 1);
    assert!(!tracker.refresh(t.current_node_id(), t.nodes(), t.revision()));

    t.navigate("c").unwrap();
    assert!(tracker.refresh(t.current_node_id(), t.nodes(), t.revision()));
    assert_eq!(tracker.path().len(), 4);

    t.insert(DialogueNode::new("e", "c", BranchType::Main, "")).unwrap();
    assert!(tracker.refresh(t.current_node_id(), t.nodes(), t.revision()));
    assert!(!tracker.path().contains("e"));

    t.jump_to_timeline("d").unwrap();
    tracker.refresh(t.current_node_id(), t.nodes(), t.revision());
    let expected: BTreeSet<String> = ["root", "a", "d"].iter().map(|s| s.to_string()).collect();
    assert_eq!(ids(tracker.path()), expected);
}
