//! # SPV Merkle
//!
//! Binary hash tree over an ordered record list, with compact inclusion
//! proofs for simplified payment verification.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       SPV MERKLE                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Shared primitives                         │
//! │  ├── hash.rs     - SHA-256 leaf/node digests, hex helpers    │
//! │  └── config.rs   - Build configuration                       │
//! │                                                              │
//! │  tree/           - Full-data holder side                     │
//! │  ├── hash_tree.rs- Build, path lookup, sibling hashes        │
//! │  ├── node.rs     - Arena nodes                               │
//! │  └── path.rs     - Left/right paths                          │
//! │                                                              │
//! │  proof/          - Light-client side                         │
//! │  ├── inclusion.rs- Proof payload, LightVerifier              │
//! │  └── verify.rs   - Stateless root recomputation              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Flow
//!
//! 1. The holder of the full record set calls [`HashTree::build`] once.
//! 2. For a requested record it produces an [`InclusionProof`]
//!    (leaf hash, path, sibling hashes).
//! 3. The light client, holding only a trusted root, runs [`verify`].
//!
//! A tree is immutable once built and can be shared between threads
//! without locking.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod proof;
pub mod tree;

// Re-export commonly used types
pub use crate::core::config::TreeConfig;
pub use crate::core::hash::{hash_leaf, hash_nodes, NodeHash};
pub use proof::{verify, InclusionProof, LightVerifier, ProofError};
pub use tree::{Direction, HashTree, Path, TreeError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
