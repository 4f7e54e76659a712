/// Violations of the rooted-tree invariant, reported by [`crate::store::DialogueTree`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("node '{0}' already exists")]
    DuplicateId(String),
    #[error("node '{node}' references unknown parent '{parent}'")]
    MissingParent { node: String, parent: String },
    #[error("node '{0}' has no parent but is not the root")]
    SecondRoot(String),
    #[error("the root node must not have a parent (got '{0}')")]
    RootHasParent(String),
    #[error("unknown node '{0}'")]
    UnknownNode(String),
    #[error("tree document does not start with the root node")]
    MissingRoot,
}
