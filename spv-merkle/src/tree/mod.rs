//! Hash Tree
//!
//! Construction of the complete binary tree, path lookup and sibling-hash
//! derivation for the full-data holder.

pub mod hash_tree;
pub mod node;
pub mod path;

pub use hash_tree::{HashTree, TreeError};
pub use node::{NodeId, TreeNode};
pub use path::{Direction, Path};
