//! Digest Helpers
//!
//! SHA-256 hashing shared by tree construction and proof verification:
//! - Leaf hashing over raw record bytes
//! - Node hashing over two concatenated 32-byte child digests
//! - Hex encoding for display and serde

use sha2::{Digest, Sha256};

/// Digest output type (256 bits / 32 bytes)
pub type NodeHash = [u8; 32];

/// Length of a node digest in bytes.
pub const HASH_LEN: usize = 32;

/// Hash a record into its leaf digest.
///
/// No domain separation: leaves are plain `SHA256(record)`.
#[inline]
pub fn hash_leaf(record: &[u8]) -> NodeHash {
    let mut hasher = Sha256::new();
    hasher.update(record);
    hasher.finalize().into()
}

/// Hash two child digests into their parent digest, left first.
#[inline]
pub fn hash_nodes(left: &NodeHash, right: &NodeHash) -> NodeHash {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Lowercase hex rendering of a digest.
pub fn to_hex(hash: &NodeHash) -> String {
    hex::encode(hash)
}

/// Parse a 64-character hex string into a digest.
pub fn from_hex(s: &str) -> Result<NodeHash, hex::FromHexError> {
    let mut out = [0u8; HASH_LEN];
    hex::decode_to_slice(s, &mut out)?;
    Ok(out)
}

/// Serde adapter writing a single digest as hex.
pub mod serde_hex {
    use super::{from_hex, to_hex, NodeHash};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    /// Write as hex.
    pub fn serialize<S: Serializer>(hash: &NodeHash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_hex(hash))
    }

    /// Read from hex.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NodeHash, D::Error> {
        let s = String::deserialize(deserializer)?;
        from_hex(&s).map_err(D::Error::custom)
    }
}

/// Serde adapter writing a digest list as a list of hex strings.
pub mod serde_hex_vec {
    use super::{from_hex, to_hex, NodeHash};
    use serde::{de::Error, ser::SerializeSeq, Deserialize, Deserializer, Serializer};

    /// Write as a list of hex strings.
    pub fn serialize<S: Serializer>(hashes: &[NodeHash], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(hashes.len()))?;
        for hash in hashes {
            seq.serialize_element(&to_hex(hash))?;
        }
        seq.end()
    }

    /// Read from a list of hex strings.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<NodeHash>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let strings = Vec::<String>::deserialize(deserializer)?;
        strings
            .iter()
            .map(|s| from_hex(s).map_err(D::Error::custom))
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
