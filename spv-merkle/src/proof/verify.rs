//! Proof Verification
//!
//! Stateless recomputation of a root from a leaf hash, the leaf's path and
//! its sibling hashes. No tree access is needed.
//!
//! The path is the leaf's own path (root first, as returned by
//! `HashTree::find_path`). Walking it leaf first, a `Left` step means the
//! node of interest is a left child, so its sibling is hashed on the right:
//!
//! ```text
//! Left : acc = H(acc || sibling)
//! Right: acc = H(sibling || acc)
//! ```
//!
//! Any shape mismatch fails closed.

use tracing::trace;

use crate::core::hash::{hash_leaf, hash_nodes, to_hex, NodeHash};
use crate::tree::path::{Direction, Path};

/// Errors during proof verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProofError {
    /// Path and sibling list disagree, or the proof is empty.
    #[error("malformed proof: {path_len} path steps for {siblings} sibling hashes")]
    MalformedProof {
        /// Number of path steps.
        path_len: usize,
        /// Number of sibling hashes.
        siblings: usize,
    },

    /// Proof was issued for a different leaf than the record being checked.
    #[error("leaf mismatch: expected {}, supplied {}", to_hex(.expected), to_hex(.supplied))]
    LeafMismatch {
        /// Hash of the record being checked.
        expected: NodeHash,
        /// Leaf hash carried by the proof.
        supplied: NodeHash,
    },

    /// Recomputed root differs from the trusted root.
    #[error("root mismatch: expected {}, computed {}", to_hex(.expected), to_hex(.computed))]
    RootMismatch {
        /// Trusted root.
        expected: NodeHash,
        /// Root recomputed from the proof.
        computed: NodeHash,
    },
}

/// Recompute the root implied by a proof.
pub fn compute_root(
    leaf_hash: &NodeHash,
    path: &Path,
    siblings: &[NodeHash],
) -> Result<NodeHash, ProofError> {
    if path.len() != siblings.len() || siblings.is_empty() {
        return Err(ProofError::MalformedProof {
            path_len: path.len(),
            siblings: siblings.len(),
        });
    }

    let root = path
        .steps()
        .iter()
        .rev()
        .zip(siblings)
        .fold(*leaf_hash, |acc, (step, sibling)| match step {
            Direction::Left => hash_nodes(&acc, sibling),
            Direction::Right => hash_nodes(sibling, &acc),
        });
    Ok(root)
}

/// Check a proof against a trusted root, reporting why it fails.
pub fn check(
    leaf_hash: &NodeHash,
    path: &Path,
    siblings: &[NodeHash],
    expected_root: &NodeHash,
) -> Result<(), ProofError> {
    let computed = compute_root(leaf_hash, path, siblings)?;
    if computed != *expected_root {
        return Err(ProofError::RootMismatch {
            expected: *expected_root,
            computed,
        });
    }
    Ok(())
}

/// Verify a proof against a trusted root.
///
/// Returns false for any malformed proof.
pub fn verify(
    leaf_hash: &NodeHash,
    path: &Path,
    siblings: &[NodeHash],
    expected_root: &NodeHash,
) -> bool {
    match check(leaf_hash, path, siblings, expected_root) {
        Ok(()) => true,
        Err(e) => {
            trace!(leaf = %to_hex(leaf_hash), "proof rejected: {}", e);
            false
        }
    }
}

/// Verify that `record` itself is included, hashing it locally.
pub fn verify_record(
    record: &[u8],
    path: &Path,
    siblings: &[NodeHash],
    expected_root: &NodeHash,
) -> bool {
    verify(&hash_leaf(record), path, siblings, expected_root)
}
