use std::path::PathBuf;

/// Reasons a set of parent indices does not describe a single-rooted tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum HierarchyError {
    /// Hierarchy has no nodes at all.
    #[error("Hierarchy has no nodes")]
    Empty,

    /// Every node has a parent.
    #[error("Hierarchy has no root node")]
    NoRoot,

    /// More than one node has no parent.
    #[error("Nodes {first} and {second} are both roots")]
    MultipleRoots { first: usize, second: usize },

    /// Parent index does not refer to a node.
    #[error("Node {index} refers to parent {parent} out of {count} nodes")]
    ParentOutOfRange {
        index: usize,
        parent: usize,
        count: usize,
    },

    /// Node is its own parent.
    #[error("Node {index} is its own parent")]
    SelfParent { index: usize },

    /// Following parents from this node never reaches the root.
    #[error("Node {index} is part of a parent cycle")]
    Cycle { index: usize },

    /// Body enumeration did not start with the root body.
    #[error("Expected root body at index 0")]
    RootNotFirst,

    /// Root body is attached to a parent by a joint.
    #[error("Root body is attached to a parent")]
    RootHasParent,

    /// Body has more than one parent joint.
    #[error("Body {index} is attached to more than one parent")]
    MultipleParents { index: usize },

    /// Same body is enumerated twice.
    #[error("Bodies {first} and {second} are the same body")]
    DuplicateBody { first: usize, second: usize },

    /// Joint is attached to a body outside of the enumerated set.
    #[error("Joint {joint} references a body that is not in the hierarchy")]
    UnknownBody { joint: usize },
}

/// Errors that may occur while loading pose settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to open settings file `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings")]
    Ron {
        #[from]
        source: ron::Error,
    },
}
