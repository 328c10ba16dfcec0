use halo2curves_axiom::bn256::Fr;
use zkcred_crypto::NativeHasher;

/// An inclusion proof: expected root, sibling hashes leaf-level first, and a
/// direction bit per level (0 when the running node is the left child).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleProof {
    pub root: Fr,
    pub siblings: Vec<Fr>,
    pub path_indices: Vec<u8>,
}

/// Recompute the root by folding `leaf` up through the proof and compare.
///
/// Any mismatch in length, sibling value, or direction bit makes this return
/// false; it never panics on malformed proofs.
pub fn verify(hasher: &NativeHasher, root: Fr, leaf: Fr, proof: &MerkleProof) -> bool {
    if proof.siblings.len() != proof.path_indices.len() {
        return false;
    }
    let mut node = leaf;
    for (sibling, bit) in proof.siblings.iter().zip(&proof.path_indices) {
        node = match bit {
            0 => hasher.compress([node, *sibling]),
            1 => hasher.compress([*sibling, node]),
            _ => return false,
        };
    }
    node == root
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo2curves_axiom::ff::Field;

    #[test]
    fn mismatched_lengths_fail() {
        let hasher = NativeHasher::init();
        let proof = MerkleProof {
            root: Fr::zero(),
            siblings: vec![Fr::zero(), Fr::zero()],
            path_indices: vec![0],
        };
        assert!(!verify(&hasher, Fr::zero(), Fr::zero(), &proof));
    }

    #[test]
    fn non_binary_direction_fails() {
        let hasher = NativeHasher::init();
        let proof = MerkleProof {
            root: Fr::zero(),
            siblings: vec![Fr::zero()],
            path_indices: vec![7],
        };
        assert!(!verify(&hasher, Fr::zero(), Fr::zero(), &proof));
    }
}
