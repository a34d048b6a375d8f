//! Serialized Tree Artifact
//!
//! Portable JSON representation of a built tree: format tag, schema
//! descriptor, published root, and the ordered record values. Loading
//! re-parses every entry, rebuilds the tree, and cross-checks the stored
//! root, so a tampered or truncated artifact never yields a usable tree.

use serde::{Deserialize, Serialize};

use crate::merkle::{DistributionTree, DistributorError, DistributorResult, LeafSchema, Record};

/// Format tag carried by every artifact this crate writes
pub const ARTIFACT_FORMAT: &str = "merkle-distributor-v1";

/// One record value as persisted: full 0x-hex address, decimal amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub address: String,
    pub amount: String,
}

/// Portable dump of a distribution tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeArtifact {
    pub format: String,
    pub schema: LeafSchema,
    /// 0x-hex Merkle root, stored for load-time cross-checking
    pub root: String,
    pub leaf_count: usize,
    /// Record values in leaf-index order
    pub entries: Vec<ArtifactEntry>,
}

/// Dump a tree to its portable representation
pub fn dump(tree: &DistributionTree) -> TreeArtifact {
    TreeArtifact {
        format: ARTIFACT_FORMAT.to_string(),
        schema: tree.schema().clone(),
        root: format!("0x{}", hex::encode(tree.root())),
        leaf_count: tree.leaf_count(),
        entries: tree
            .entries()
            .map(|(_, record)| ArtifactEntry {
                address: record.address_hex(),
                amount: record.amount.to_string(),
            })
            .collect(),
    }
}

/// Reconstruct a tree from a loaded artifact.
///
/// Fails with `CorruptArtifact` if the format tag is unknown, the schema
/// is unsupported, the leaf count disagrees with the entry list, any entry
/// fails to re-parse, or the recomputed root differs from the stored root.
pub fn load(artifact: &TreeArtifact) -> DistributorResult<DistributionTree> {
    if artifact.format != ARTIFACT_FORMAT {
        return Err(DistributorError::CorruptArtifact(format!(
            "unknown format {:?}",
            artifact.format
        )));
    }
    artifact.schema.ensure_supported().map_err(|e| {
        DistributorError::CorruptArtifact(format!("schema check failed: {}", e))
    })?;
    if artifact.leaf_count != artifact.entries.len() {
        return Err(DistributorError::CorruptArtifact(format!(
            "leaf count mismatch: header says {}, found {} entries",
            artifact.leaf_count,
            artifact.entries.len()
        )));
    }

    let mut records = Vec::with_capacity(artifact.entries.len());
    for (index, entry) in artifact.entries.iter().enumerate() {
        let record = Record::parse(&entry.address, &entry.amount).map_err(|e| {
            DistributorError::CorruptArtifact(format!("entry {}: {}", index, e))
        })?;
        records.push(record);
    }

    let expected_root = decode_root(&artifact.root)?;
    let tree = DistributionTree::build(records)
        .map_err(|e| DistributorError::CorruptArtifact(e.to_string()))?;
    if tree.root() != expected_root {
        return Err(DistributorError::CorruptArtifact(
            "stored root does not match root recomputed from entries".to_string(),
        ));
    }

    Ok(tree)
}

fn decode_root(root: &str) -> DistributorResult<[u8; 32]> {
    let stripped = root.strip_prefix("0x").unwrap_or(root);
    let bytes = hex::decode(stripped)
        .map_err(|e| DistributorError::CorruptArtifact(format!("malformed root: {}", e)))?;
    bytes
        .try_into()
        .map_err(|_| DistributorError::CorruptArtifact("root is not 32 bytes".to_string()))
}
