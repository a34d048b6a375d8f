//! Canonical Hash Format Specification
//!
//! This module defines the exact hashing rules for the distribution tree.
//! All hashing is Keccak-256 with strong domain separation between leaf
//! and internal-node inputs, and leaf data is hashed twice so an encoded
//! record can never collide with a pair of child hashes.
//!
//! Both the tree builder and the independent proof verifier go through the
//! two functions below, so the convention cannot drift between them.

use sha3::{Digest, Keccak256};

/// Domain separators for collision resistance
pub mod domains {
    /// Leaf hash domain separator: "LEAF"
    pub const LEAF_HASH: [u8; 4] = [0x4C, 0x45, 0x41, 0x46];

    /// Internal node hash domain separator: "NODE"
    pub const NODE_HASH: [u8; 4] = [0x4E, 0x4F, 0x44, 0x45];
}

/// Tree configuration constants
pub mod tree_config {
    /// Parallel processing threshold for intra-layer hashing
    pub const PARALLEL_THRESHOLD: usize = 1000;
}

/// Keccak-256 convenience wrapper
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Generate leaf hash using canonical format
///
/// # Arguments
/// * `encoded` - Canonical encoded record bytes
///
/// # Returns
/// * 32-byte leaf hash: `keccak256(LEAF || keccak256(encoded))`
pub fn leaf_hash(encoded: &[u8]) -> [u8; 32] {
    let inner = keccak256(encoded);
    let mut hasher = Keccak256::new();
    hasher.update(&domains::LEAF_HASH);
    hasher.update(&inner);
    hasher.finalize().into()
}

/// Generate internal node hash using canonical format
///
/// The child pair is sorted lexicographically before hashing, so the same
/// multiset of leaves always yields the same root regardless of input
/// order, and proofs carry no left/right flags.
///
/// # Arguments
/// * `a` - One child hash (32 bytes)
/// * `b` - The other child hash (32 bytes)
///
/// # Returns
/// * 32-byte node hash: `keccak256(NODE || lo || hi)`
pub fn node_hash(a: [u8; 32], b: [u8; 32]) -> [u8; 32] {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Keccak256::new();
    hasher.update(&domains::NODE_HASH);
    hasher.update(&lo);
    hasher.update(&hi);
    hasher.finalize().into()
}
