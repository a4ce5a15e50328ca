//! SPV Merkle Demo
//!
//! Builds a tree from the command-line arguments (or a default record set),
//! proves the last record and verifies the proof as a light client would.

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use spv_merkle::{core::hash::to_hex, HashTree, LightVerifier, VERSION};

/// Records used when none are given.
const DEFAULT_RECORDS: [&str; 9] = ["123", "456", "789", "abc", "def", "ghi", "jkl", "mno", "pqr"];

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("SPV Merkle v{}", VERSION);

    let mut records: Vec<String> = std::env::args().skip(1).collect();
    if records.is_empty() {
        records = DEFAULT_RECORDS.iter().map(|s| s.to_string()).collect();
    }

    demo(&records)
}

/// Full-node / light-client round trip.
fn demo(records: &[String]) -> anyhow::Result<()> {
    info!("=== Full Node ===");
    let tree = HashTree::build(records)?;
    info!(
        "{} records, {} leaves ({} padding), height {}",
        tree.record_count(),
        tree.leaf_count(),
        tree.padding_count(),
        tree.height()
    );
    info!("Root: {}", to_hex(&tree.root_hash()));

    let target = records.len() - 1;
    let record = &records[target];
    let proof = tree.prove_data(record.as_bytes())?;
    info!("Proof for {:?}: path {}", record, proof.path);
    for (level, sibling) in proof.siblings.iter().enumerate() {
        info!("  sibling {}: {}", level, to_hex(sibling));
    }
    info!("Payload ({} bytes): {}", proof.size(), serde_json::to_string(&proof)?);

    info!("=== Light Client ===");
    let client = LightVerifier::new(tree.root_hash());
    match client.check_record(record.as_bytes(), &proof) {
        Ok(()) => info!("INCLUSION VERIFIED: {:?} is in the tree", record),
        Err(e) => warn!("INCLUSION FAILED: {}", e),
    }

    let forged = format!("{}'", record);
    if client.verify_record(forged.as_bytes(), &proof) {
        warn!("Forged record {:?} unexpectedly verified", forged);
    } else {
        info!("Forged record {:?} rejected", forged);
    }

    Ok(())
}
