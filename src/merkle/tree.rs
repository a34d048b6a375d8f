//! Distribution tree construction and proof generation
//!
//! The tree is immutable once built: it owns the record array in original
//! input order (leaf indices are stable handles) and the full layer-by-layer
//! hash layout, so proof generation is a lock-free read.

use ethers::types::Address;
use rayon::prelude::*;

use crate::canonical::{leaf_hash, node_hash, tree_config};

use super::proof::InclusionProof;
use super::record::{LeafSchema, Record};
use super::{DistributorError, DistributorResult};

/// Immutable Merkle tree over a fixed set of entitlement records
#[derive(Debug, Clone)]
pub struct DistributionTree {
    schema: LeafSchema,
    records: Vec<Record>,
    /// Hash layers from leaves (index 0) up to the single-root layer
    layers: Vec<Vec<[u8; 32]>>,
}

impl DistributionTree {
    /// Build the tree from an already-validated record set.
    ///
    /// Reordering the input never changes the root (pairs are canonically
    /// sorted before hashing) but does change leaf indices. Duplicate
    /// records are permitted and produce duplicate leaves; they do not
    /// collapse.
    pub fn build(records: Vec<Record>) -> DistributorResult<Self> {
        if records.is_empty() {
            return Err(DistributorError::EmptyInput);
        }

        let leaves: Vec<[u8; 32]> = records.iter().map(|r| leaf_hash(&r.encode())).collect();

        // Build tree bottom-up; layers are sequential, pairs within a
        // layer are independent.
        let mut layers = vec![leaves];
        while layers[layers.len() - 1].len() > 1 {
            let next = next_layer(&layers[layers.len() - 1]);
            layers.push(next);
        }

        log::debug!(
            "built distribution tree: {} leaves, {} layers",
            records.len(),
            layers.len()
        );

        Ok(Self {
            schema: LeafSchema::address_uint256(),
            records,
            layers,
        })
    }

    /// The published commitment
    pub fn root(&self) -> [u8; 32] {
        // build() leaves exactly one hash in the top layer
        self.layers[self.layers.len() - 1][0]
    }

    pub fn leaf_count(&self) -> usize {
        self.records.len()
    }

    pub fn schema(&self) -> &LeafSchema {
        &self.schema
    }

    /// Record at a leaf index, in original input order
    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// All records with their stable leaf indices
    pub fn entries(&self) -> impl Iterator<Item = (usize, &Record)> {
        self.records.iter().enumerate()
    }

    /// First leaf index holding the given address
    pub fn index_of(&self, address: &Address) -> Option<usize> {
        self.records.iter().position(|r| r.address == *address)
    }

    /// Generate the inclusion proof for the leaf at `index`.
    ///
    /// Walks from the leaf position up to the root, recording the sibling
    /// hash at each layer. A node carried up from an odd-length layer has
    /// no sibling there, so nothing is appended for that layer.
    pub fn proof(&self, index: usize) -> DistributorResult<InclusionProof> {
        if index >= self.records.len() {
            return Err(DistributorError::IndexOutOfRange {
                index,
                leaf_count: self.records.len(),
            });
        }

        let mut siblings = Vec::new();
        let mut position = index;
        for layer in &self.layers[..self.layers.len() - 1] {
            let sibling = position ^ 1;
            if sibling < layer.len() {
                siblings.push(layer[sibling]);
            }
            position /= 2;
        }

        Ok(InclusionProof { siblings })
    }
}

/// Combine one layer into the next: adjacent pairs are hashed with the
/// canonical node hash; an unpaired trailing hash is carried up unchanged.
fn next_layer(level: &[[u8; 32]]) -> Vec<[u8; 32]> {
    let pair = |chunk: &[[u8; 32]]| {
        if chunk.len() == 2 {
            node_hash(chunk[0], chunk[1])
        } else {
            chunk[0]
        }
    };

    if level.len() >= tree_config::PARALLEL_THRESHOLD {
        level.par_chunks(2).map(pair).collect()
    } else {
        level.chunks(2).map(pair).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merkle::verify;
    use ethers::types::U256;

    fn record(address: &str, amount: u64) -> Record {
        Record::new(address.parse().unwrap(), U256::from(amount))
    }

    fn sample_records() -> Vec<Record> {
        vec![
            record("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1", 100),
            record("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb2", 200),
            record("0xccccccccccccccccccccccccccccccccccccccc3", 300),
        ]
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(
            DistributionTree::build(Vec::new()),
            Err(DistributorError::EmptyInput)
        ));
    }

    #[test]
    fn test_root_is_order_independent() {
        let records = sample_records();
        let reference = DistributionTree::build(records.clone()).unwrap().root();

        let permutations: [[usize; 3]; 6] = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        for perm in permutations {
            let shuffled: Vec<Record> = perm.iter().map(|&i| records[i]).collect();
            let tree = DistributionTree::build(shuffled).unwrap();
            assert_eq!(tree.root(), reference);
        }
    }

    #[test]
    fn test_reordering_changes_indices_not_root() {
        let records = sample_records();
        let forward = DistributionTree::build(records.clone()).unwrap();
        let reversed =
            DistributionTree::build(records.iter().rev().copied().collect()).unwrap();

        assert_eq!(forward.root(), reversed.root());
        assert_eq!(forward.index_of(&records[0].address), Some(0));
        assert_eq!(reversed.index_of(&records[0].address), Some(2));
    }

    #[test]
    fn test_single_record_tree() {
        let records = vec![record("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1", 100)];
        let tree = DistributionTree::build(records.clone()).unwrap();

        // No internal hashing: the root is the leaf hash itself
        assert_eq!(tree.root(), leaf_hash(&records[0].encode()));

        let proof = tree.proof(0).unwrap();
        assert!(proof.siblings.is_empty());
        assert!(verify(tree.root(), tree.schema(), &records[0], &proof).unwrap());
    }

    #[test]
    fn test_odd_record_count_carries_unpaired_leaf() {
        let records = sample_records();
        let tree = DistributionTree::build(records.clone()).unwrap();

        // 3 leaves -> [pair, carry] -> root
        assert_eq!(tree.proof(0).unwrap().siblings.len(), 2);
        assert_eq!(tree.proof(1).unwrap().siblings.len(), 2);
        // the carried leaf skips its own layer and pairs one level up
        assert_eq!(tree.proof(2).unwrap().siblings.len(), 1);

        for (index, rec) in tree.entries() {
            let proof = tree.proof(index).unwrap();
            assert!(verify(tree.root(), tree.schema(), rec, &proof).unwrap());
        }
    }

    #[test]
    fn test_all_leaves_verify_in_even_tree() {
        let mut records = sample_records();
        records.push(record("0xddddddddddddddddddddddddddddddddddddddd4", 400));
        let tree = DistributionTree::build(records).unwrap();

        for (index, rec) in tree.entries() {
            let proof = tree.proof(index).unwrap();
            assert!(verify(tree.root(), tree.schema(), rec, &proof).unwrap());
        }
    }

    #[test]
    fn test_tampered_amount_fails_verification() {
        let records = sample_records();
        let tree = DistributionTree::build(records.clone()).unwrap();
        let proof = tree.proof(0).unwrap();

        let tampered = Record::new(records[0].address, U256::from(999u64));
        assert!(!verify(tree.root(), tree.schema(), &tampered, &proof).unwrap());
    }

    #[test]
    fn test_foreign_record_fails_against_other_proof() {
        let records = sample_records();
        let tree = DistributionTree::build(records.clone()).unwrap();

        // records[1] against the proof generated for records[0]
        let proof = tree.proof(0).unwrap();
        assert!(!verify(tree.root(), tree.schema(), &records[1], &proof).unwrap());
    }

    #[test]
    fn test_proof_index_out_of_range() {
        let tree = DistributionTree::build(sample_records()).unwrap();

        match tree.proof(3) {
            Err(DistributorError::IndexOutOfRange { index, leaf_count }) => {
                assert_eq!(index, 3);
                assert_eq!(leaf_count, 3);
            }
            other => panic!("expected IndexOutOfRange, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_duplicate_records_do_not_collapse() {
        let rec = record("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1", 100);
        let tree = DistributionTree::build(vec![rec, rec]).unwrap();

        assert_eq!(tree.leaf_count(), 2);
        for index in 0..2 {
            let proof = tree.proof(index).unwrap();
            assert!(verify(tree.root(), tree.schema(), &rec, &proof).unwrap());
        }
        // first-match semantics for address lookup
        assert_eq!(tree.index_of(&rec.address), Some(0));
    }

    #[test]
    fn test_larger_tree_verifies_everywhere() {
        // Crosses several odd/even layer boundaries
        let records: Vec<Record> = (1..=11u64)
            .map(|i| {
                record(
                    &format!("0x{:040x}", i),
                    i * 1_000,
                )
            })
            .collect();
        let tree = DistributionTree::build(records).unwrap();

        for (index, rec) in tree.entries() {
            let proof = tree.proof(index).unwrap();
            assert!(verify(tree.root(), tree.schema(), rec, &proof).unwrap());
        }
    }
}
