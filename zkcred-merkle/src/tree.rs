use halo2curves_axiom::bn256::Fr;
use halo2curves_axiom::ff::Field;
use tracing::debug;
use zkcred_crypto::NativeHasher;

use crate::proof::MerkleProof;
use crate::MerkleError;

/// A fixed-depth binary Merkle tree built once from an ordered leaf sequence.
///
/// All levels are materialized at build time, so proofs are O(depth) lookups.
/// The tree is immutable after construction and shareable across threads.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    depth: usize,
    levels: Vec<Vec<Fr>>,
    zeros: Vec<Fr>,
}

impl MerkleTree {
    /// Build a tree of `depth` levels over `leaves`, padding with the zero
    /// element. Leaf order is significant and preserved.
    pub fn build(
        hasher: &NativeHasher,
        leaves: &[Fr],
        depth: usize,
    ) -> Result<Self, MerkleError> {
        let capacity = 1usize
            .checked_shl(depth as u32)
            .unwrap_or(usize::MAX);
        if leaves.len() > capacity {
            return Err(MerkleError::DepthExceeded {
                leaf_count: leaves.len(),
                depth,
            });
        }

        let mut zeros = Vec::with_capacity(depth + 1);
        zeros.push(Fr::zero());
        for level in 0..depth {
            let zero = zeros[level];
            zeros.push(hasher.compress([zero, zero]));
        }

        let mut levels = Vec::with_capacity(depth + 1);
        levels.push(leaves.to_vec());
        for level in 0..depth {
            let current = &levels[level];
            let mut next = Vec::with_capacity((current.len() + 1) / 2);
            for pair in 0..(current.len() + 1) / 2 {
                let left = current[2 * pair];
                let right = current
                    .get(2 * pair + 1)
                    .copied()
                    .unwrap_or(zeros[level]);
                next.push(hasher.compress([left, right]));
            }
            levels.push(next);
        }

        debug!(depth, leaf_count = leaves.len(), "built merkle tree");
        Ok(Self {
            depth,
            levels,
            zeros,
        })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    pub fn root(&self) -> Fr {
        self.levels[self.depth]
            .first()
            .copied()
            .unwrap_or(self.zeros[self.depth])
    }

    /// Inclusion proof for the leaf at `index`: one sibling and one direction
    /// bit per level, leaf level first.
    pub fn prove(&self, index: usize) -> Result<MerkleProof, MerkleError> {
        if index >= self.leaf_count() {
            return Err(MerkleError::IndexOutOfRange {
                index,
                leaf_count: self.leaf_count(),
            });
        }

        let mut siblings = Vec::with_capacity(self.depth);
        let mut path_indices = Vec::with_capacity(self.depth);
        let mut position = index;
        for level in 0..self.depth {
            let sibling_index = position ^ 1;
            let sibling = self.levels[level]
                .get(sibling_index)
                .copied()
                .unwrap_or(self.zeros[level]);
            siblings.push(sibling);
            path_indices.push((position & 1) as u8);
            position >>= 1;
        }

        Ok(MerkleProof {
            root: self.root(),
            siblings,
            path_indices,
        })
    }
}
