//! In-memory dialogue store.
//!
//! The timeline engine only talks to the store through [`NodeStore`], so a host
//! application can plug in its own persistence. [`DialogueTree`] is the
//! reference implementation used by the CLI, the viewer and the tests.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use camino::Utf8Path;
use tracing::debug;

use crate::error::TreeError;
use crate::model::{DialogueNode, NodeTable, ROOT_ID, TreeDoc};

/// Read access to the dialogue tree plus the navigation commands the timeline
/// issues back.
pub trait NodeStore {
    fn nodes(&self) -> &NodeTable;
    fn current_node_id(&self) -> &str;
    fn explored_branches(&self) -> &BTreeSet<String>;
    /// Changes whenever the node collection or the current node changes.
    fn revision(&self) -> u64;
    fn navigate(&mut self, node_id: &str) -> Result<(), TreeError>;
    fn jump_to_timeline(&mut self, node_id: &str) -> Result<(), TreeError>;
    fn update_system_prompt(&mut self, content: &str);
}

#[derive(Debug, Clone)]
pub struct DialogueTree {
    nodes: NodeTable,
    current_node_id: String,
    explored_branches: BTreeSet<String>,
    revision: u64,
}

impl DialogueTree {
    /// A tree holding only the root node, which is also the current node.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let mut nodes = NodeTable::new();
        nodes.insert(ROOT_ID.to_string(), DialogueNode::root(system_prompt));
        Self {
            nodes,
            current_node_id: ROOT_ID.to_string(),
            explored_branches: BTreeSet::new(),
            revision: 0,
        }
    }

    /// Build a tree from a document, validating every node on the way in.
    pub fn from_doc(doc: TreeDoc) -> Result<Self, TreeError> {
        let mut it = doc.nodes.into_iter();
        let root = match it.next() {
            Some(n) if n.is_root() => n,
            _ => return Err(TreeError::MissingRoot),
        };
        if let Some(p) = &root.parent_id {
            return Err(TreeError::RootHasParent(p.clone()));
        }
        let mut tree = DialogueTree::new(root.content);
        for node in it {
            tree.insert(node)?;
        }
        for id in doc.explored_branches {
            if !tree.nodes.contains_key(&id) {
                return Err(TreeError::UnknownNode(id));
            }
            tree.explored_branches.insert(id);
        }
        if let Some(cur) = doc.current_node_id {
            tree.navigate(&cur)?;
        }
        Ok(tree)
    }

    /// Load a JSON tree document from disk.
    pub fn load_json(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_context(|| format!("Open {}", path))?;
        let doc: TreeDoc =
            serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path))?;
        let tree = DialogueTree::from_doc(doc).with_context(|| format!("Invalid tree in {}", path))?;
        Ok(tree)
    }

    /// Snapshot the tree back into its document form.
    pub fn to_doc(&self) -> TreeDoc {
        TreeDoc {
            current_node_id: Some(self.current_node_id.clone()),
            explored_branches: self.explored_branches.iter().cloned().collect(),
            nodes: self.nodes.values().cloned().collect(),
        }
    }

    /// Append a node under an existing parent. The parent's child list is
    /// updated so it stays consistent with `parent_id`.
    pub fn insert(&mut self, mut node: DialogueNode) -> Result<(), TreeError> {
        if self.nodes.contains_key(&node.id) {
            return Err(TreeError::DuplicateId(node.id));
        }
        let parent_id = match node.parent_id.clone() {
            Some(p) => p,
            None => return Err(TreeError::SecondRoot(node.id)),
        };
        let Some(parent) = self.nodes.get_mut(&parent_id) else {
            return Err(TreeError::MissingParent {
                node: node.id,
                parent: parent_id,
            });
        };
        parent.children.push(node.id.clone());
        node.children.clear();
        debug!(node = %node.id, parent = %parent_id, branch = %node.branch_type(), "insert node");
        self.nodes.insert(node.id.clone(), node);
        self.revision += 1;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&DialogueNode> {
        self.nodes.get(id)
    }

    pub fn children_of(&self, id: &str) -> &[String] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn system_prompt(&self) -> &str {
        self.nodes.get(ROOT_ID).map(|n| n.content.as_str()).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn set_current(&mut self, node_id: &str) -> Result<(), TreeError> {
        if !self.nodes.contains_key(node_id) {
            return Err(TreeError::UnknownNode(node_id.to_string()));
        }
        if self.current_node_id != node_id {
            debug!(from = %self.current_node_id, to = %node_id, "navigate");
            self.current_node_id = node_id.to_string();
            self.revision += 1;
        }
        Ok(())
    }
}

impl NodeStore for DialogueTree {
    fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    fn current_node_id(&self) -> &str {
        &self.current_node_id
    }

    fn explored_branches(&self) -> &BTreeSet<String> {
        &self.explored_branches
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn navigate(&mut self, node_id: &str) -> Result<(), TreeError> {
        self.set_current(node_id)
    }

    /// Switch to another timeline and remember it as explored.
    fn jump_to_timeline(&mut self, node_id: &str) -> Result<(), TreeError> {
        self.set_current(node_id)?;
        if self.explored_branches.insert(node_id.to_string()) {
            self.revision += 1;
        }
        Ok(())
    }

    fn update_system_prompt(&mut self, content: &str) {
        if let Some(root) = self.nodes.get_mut(ROOT_ID) {
            if root.content != content {
                root.content = content.to_string();
                self.revision += 1;
            }
        }
    }
}
