use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Id of the single root node of every dialogue tree.
pub const ROOT_ID: &str = "root";

/// Node table keyed by id. Iteration order is insertion (creation) order, so a
/// parent always comes before its children.
pub type NodeTable = IndexMap<String, DialogueNode>;

// ────────────────────────────────────────────────────────────────────────────
// Branch type
// ────────────────────────────────────────────────────────────────────────────

/// How a node relates to its parent. Drives the default layout offset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum BranchType {
    /// Continues the parent's timeline.
    #[default]
    Main,
    /// Forks off into an alternate timeline.
    Alternate,
    /// Rejoins a timeline.
    Merged,
}

impl BranchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchType::Main => "main",
            BranchType::Alternate => "alternate",
            BranchType::Merged => "merged",
        }
    }
}

impl std::fmt::Display for BranchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// DialogueNode
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NodeMetadata {
    #[serde(default)]
    pub branch_type: BranchType,
}

/// One turn of the dialogue history.
///
/// `children` is materialized by the store and always mirrors `parent_id`;
/// it is ignored when deserializing a tree document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DialogueNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub metadata: NodeMetadata,
    #[serde(default, skip_deserializing)]
    pub children: Vec<String>,
}

impl DialogueNode {
    /// The root node. Its content doubles as the system prompt.
    pub fn root(system_prompt: impl Into<String>) -> Self {
        Self {
            id: ROOT_ID.to_string(),
            parent_id: None,
            content: system_prompt.into(),
            metadata: NodeMetadata::default(),
            children: Vec::new(),
        }
    }

    pub fn new(
        id: impl Into<String>,
        parent_id: impl Into<String>,
        branch_type: BranchType,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: Some(parent_id.into()),
            content: content.into(),
            metadata: NodeMetadata { branch_type },
            children: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }

    pub fn branch_type(&self) -> BranchType {
        self.metadata.branch_type
    }
}

// ────────────────────────────────────────────────────────────────────────────
// TreeDoc – JSON document wrapper
// ────────────────────────────────────────────────────────────────────────────

/// On-disk shape of a dialogue tree, as read by the CLI and the viewer demo.
///
/// `nodes` must list the root first and every parent before its children.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TreeDoc {
    #[serde(default)]
    pub current_node_id: Option<String>,
    #[serde(default)]
    pub explored_branches: Vec<String>,
    pub nodes: Vec<DialogueNode>,
}
