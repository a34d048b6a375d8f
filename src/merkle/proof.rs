//! Inclusion proofs and independent verification
//!
//! Verification needs only the published root, the schema, the claimed
//! record, and the sibling path. It shares the canonical hash rules with
//! the builder, so a proof that folds back to the root is a membership
//! witness for exactly one encoded leaf.

use serde::{Deserialize, Serialize};

use crate::canonical::{leaf_hash, node_hash};

use super::record::{LeafSchema, Record};
use super::DistributorResult;

/// Ordered sibling hashes from a leaf's position up to (excluding) the
/// root. Pairs are canonically sorted before hashing, so no left/right
/// flags are carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    pub siblings: Vec<[u8; 32]>,
}

impl InclusionProof {
    /// Proof length in hashes (log-depth of the tree walk)
    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }
}

/// Verify a record's membership against a trusted root.
///
/// A hash mismatch is the normal `false` result, not an error; only an
/// unsupported schema fails with an encoding error.
pub fn verify(
    root: [u8; 32],
    schema: &LeafSchema,
    record: &Record,
    proof: &InclusionProof,
) -> DistributorResult<bool> {
    schema.ensure_supported()?;

    let mut current = leaf_hash(&record.encode());
    for sibling in &proof.siblings {
        current = node_hash(current, *sibling);
    }
    Ok(current == root)
}
