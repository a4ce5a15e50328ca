//! Tree Nodes
//!
//! Nodes live in an arena owned by the tree. Child and parent links are
//! arena indices, so the parent back-reference never owns anything.

use crate::core::hash::NodeHash;

/// Index of a node in the tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw arena index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One node of the binary hash tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    /// Digest stored at this node.
    pub hash: NodeHash,
    /// Distance from the root (root = 0). Diagnostics only.
    pub depth: usize,
    /// Left child, None for leaves.
    pub left: Option<NodeId>,
    /// Right child, None for leaves.
    pub right: Option<NodeId>,
    /// Parent, None for the root.
    pub parent: Option<NodeId>,
}

impl TreeNode {
    /// Create a leaf.
    pub(crate) fn leaf(hash: NodeHash, depth: usize) -> Self {
        Self {
            hash,
            depth,
            left: None,
            right: None,
            parent: None,
        }
    }

    /// Create an internal node over two children.
    pub(crate) fn internal(hash: NodeHash, depth: usize, left: NodeId, right: NodeId) -> Self {
        Self {
            hash,
            depth,
            left: Some(left),
            right: Some(right),
            parent: None,
        }
    }

    /// Is this the root?
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Is this a leaf?
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Does this node have a left child?
    pub fn has_left(&self) -> bool {
        self.left.is_some()
    }

    /// Does this node have a right child?
    pub fn has_right(&self) -> bool {
        self.right.is_some()
    }
}
