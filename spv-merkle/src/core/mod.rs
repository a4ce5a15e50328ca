//! Shared primitives.
//!
//! Digest helpers and build configuration used by both the tree and the
//! proof verifier.

pub mod config;
pub mod hash;

// Re-export core types
pub use config::TreeConfig;
pub use hash::{hash_leaf, hash_nodes, NodeHash, HASH_LEN};
