//! Inclusion Proofs
//!
//! Proof payloads and the stateless verifier a light client runs against a
//! trusted root.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      PROOF SYSTEM                             │
//! ├──────────────────────────────────────────────────────────────┤
//! │  inclusion.rs - InclusionProof payload, LightVerifier         │
//! │  verify.rs    - Root recomputation and fail-closed checks     │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod inclusion;
pub mod verify;

// Re-export key types
pub use inclusion::{InclusionProof, LightVerifier};
pub use verify::{check, compute_root, verify, verify_record, ProofError};
