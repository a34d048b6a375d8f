// Core modules
pub mod artifact;
pub mod canonical;
pub mod merkle;

// Re-export main types for easy access
pub use artifact::{dump, load, ArtifactEntry, TreeArtifact, ARTIFACT_FORMAT};
pub use merkle::{
    verify, DistributionTree, DistributorError, DistributorResult, InclusionProof, LeafSchema,
    Record, ENCODED_LEAF_SIZE,
};
