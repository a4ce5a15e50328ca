//! Inclusion Proofs
//!
//! The payload a full-data holder hands to a light client, and the light
//! client's side of the exchange.

use serde::{Deserialize, Serialize};

use crate::core::hash::{hash_leaf, serde_hex, serde_hex_vec, NodeHash};
use crate::proof::verify::{check, compute_root, verify, ProofError};
use crate::tree::path::Path;

/// Proof that a leaf hash is included under some root.
///
/// Serializes with hex digests and `"left"`/`"right"` steps. Transport is
/// up to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    /// Hash of the proven leaf.
    #[serde(with = "serde_hex")]
    pub leaf_hash: NodeHash,
    /// Leaf path, root first.
    pub path: Path,
    /// Sibling hashes, leaf level first.
    #[serde(with = "serde_hex_vec")]
    pub siblings: Vec<NodeHash>,
}

impl InclusionProof {
    /// Root implied by this proof.
    pub fn compute_root(&self) -> Result<NodeHash, ProofError> {
        compute_root(&self.leaf_hash, &self.path, &self.siblings)
    }

    /// Verify against a trusted root.
    pub fn verify(&self, expected_root: &NodeHash) -> bool {
        verify(&self.leaf_hash, &self.path, &self.siblings, expected_root)
    }

    /// Verify against a trusted root, reporting why it fails.
    pub fn check(&self, expected_root: &NodeHash) -> Result<(), ProofError> {
        check(&self.leaf_hash, &self.path, &self.siblings, expected_root)
    }

    /// Does this proof speak for `record`?
    pub fn is_for_record(&self, record: &[u8]) -> bool {
        hash_leaf(record) == self.leaf_hash
    }

    /// Estimated size in bytes (leaf + one bit per step + siblings).
    pub fn size(&self) -> usize {
        32 + self.path.len().div_ceil(8) + self.siblings.len() * 32
    }
}

/// Light-client side: holds a root trusted out of band (e.g. from a block
/// header) and checks record proofs against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LightVerifier {
    trusted_root: NodeHash,
}

impl LightVerifier {
    /// Create a verifier for a trusted root.
    pub fn new(trusted_root: NodeHash) -> Self {
        Self { trusted_root }
    }

    /// The trusted root.
    pub fn trusted_root(&self) -> &NodeHash {
        &self.trusted_root
    }

    /// Check that `record` is included.
    ///
    /// The leaf hash is recomputed from the record, never taken from the
    /// proof: a proof for a different record fails even if it is otherwise
    /// valid.
    pub fn verify_record(&self, record: &[u8], proof: &InclusionProof) -> bool {
        proof.is_for_record(record) && proof.verify(&self.trusted_root)
    }

    /// Same as [`LightVerifier::verify_record`], reporting the failure.
    pub fn check_record(&self, record: &[u8], proof: &InclusionProof) -> Result<(), ProofError> {
        let expected = hash_leaf(record);
        if expected != proof.leaf_hash {
            return Err(ProofError::LeafMismatch {
                expected,
                supplied: proof.leaf_hash,
            });
        }
        proof.check(&self.trusted_root)
    }
}
