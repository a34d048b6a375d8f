//! Inclusion Proof Query Tool
//!
//! Loads a serialized tree artifact, locates one address, and prints its
//! leaf index, amount, and sibling path, then re-verifies the proof
//! independently against the artifact root.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use ethers::types::Address;
use merkle_distributor::{load, verify, TreeArtifact};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let mut args = env::args().skip(1);
    let artifact_path = PathBuf::from(
        args.next()
            .unwrap_or_else(|| "distribution/tree.json".to_string()),
    );
    let address = args
        .next()
        .ok_or_else(|| anyhow!("usage: prove [tree.json] <address>"))?;

    let target: Address = address
        .parse()
        .with_context(|| format!("malformed address {:?}", address))?;

    let raw = fs::read_to_string(&artifact_path)
        .with_context(|| format!("failed to read {}", artifact_path.display()))?;
    let artifact: TreeArtifact =
        serde_json::from_str(&raw).context("failed to parse artifact")?;
    let tree = load(&artifact).context("artifact failed consistency checks")?;

    let index = tree
        .index_of(&target)
        .ok_or_else(|| anyhow!("address {} not found in tree", address))?;
    // index_of only returns indices the tree handed out
    let record = *tree
        .record(index)
        .ok_or_else(|| anyhow!("missing record at index {}", index))?;
    let proof = tree.proof(index)?;

    println!("Leaf index: {}", index);
    println!("Amount: {}", record.amount);
    println!("Leaf value: 0x{}", hex::encode(record.encode()));
    println!("Proof ({} siblings):", proof.len());
    for sibling in &proof.siblings {
        println!("  0x{}", hex::encode(sibling));
    }

    let valid = verify(tree.root(), tree.schema(), &record, &proof)?;
    println!("Merkle root: 0x{}", hex::encode(tree.root()));
    println!("Is valid proof: {}", valid);

    Ok(())
}
