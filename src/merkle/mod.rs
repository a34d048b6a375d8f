//! Distribution Merkle Tree Module
//!
//! Builds the commitment tree over entitlement records, generates
//! inclusion proofs, and verifies them against a published root:
//! - Record parsing and canonical leaf encoding
//! - Order-independent tree construction (canonical pair sorting)
//! - Inclusion proof generation over stable leaf indices
//! - Independent proof verification from root + record + siblings

pub mod proof;
pub mod record;
pub mod tree;

// Re-export main types
pub use proof::{verify, InclusionProof};
pub use record::{LeafSchema, Record, ENCODED_LEAF_SIZE};
pub use tree::DistributionTree;

/// Distribution tree error types
#[derive(Debug, thiserror::Error)]
pub enum DistributorError {
    /// Malformed address or amount at leaf-encode time
    #[error("encoding error: {0}")]
    Encoding(String),

    /// No valid records to build from; the root of an empty set is undefined
    #[error("cannot build a tree from an empty record set")]
    EmptyInput,

    /// Proof requested for a nonexistent leaf
    #[error("leaf index {index} out of range for tree with {leaf_count} leaves")]
    IndexOutOfRange { index: usize, leaf_count: usize },

    /// Deserialized tree failed an internal consistency check
    #[error("corrupt artifact: {0}")]
    CorruptArtifact(String),
}

/// Result type for distribution tree operations
pub type DistributorResult<T> = Result<T, DistributorError>;
