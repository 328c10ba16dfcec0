use halo2curves_axiom::bn256::Fr;
use zkcred_crypto::field::fr_from_hex_str;
use zkcred_crypto::NativeHasher;

use crate::tree::MerkleTree;
use crate::MerkleError;

/// A normalized identity membership set.
///
/// Identities are lower-cased and lexicographically sorted before insertion;
/// provers locate their index through the same normalization, so build-time
/// and proof-time ordering can never drift apart.
#[derive(Clone, Debug)]
pub struct MembershipSet {
    identities: Vec<String>,
    leaves: Vec<Fr>,
}

impl MembershipSet {
    pub fn new(identities: &[String]) -> Result<Self, MerkleError> {
        let mut normalized: Vec<String> =
            identities.iter().map(|id| id.to_lowercase()).collect();
        normalized.sort();
        let leaves = normalized
            .iter()
            .map(|id| {
                fr_from_hex_str(id).map_err(|_| MerkleError::InvalidIdentity(id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            identities: normalized,
            leaves,
        })
    }

    /// The sorted, lower-cased identities in leaf order.
    pub fn identities(&self) -> &[String] {
        &self.identities
    }

    pub fn leaves(&self) -> &[Fr] {
        &self.leaves
    }

    /// Locate an identity in the normalized ordering.
    pub fn index_of(&self, identity: &str) -> Result<usize, MerkleError> {
        let normalized = identity.to_lowercase();
        self.identities
            .binary_search(&normalized)
            .map_err(|_| MerkleError::MemberNotFound(identity.to_string()))
    }

    pub fn tree(&self, hasher: &NativeHasher, depth: usize) -> Result<MerkleTree, MerkleError> {
        MerkleTree::build(hasher, &self.leaves, depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::verify;
    use crate::MEMBERSHIP_TREE_DEPTH;

    fn sample_identities() -> Vec<String> {
        vec![
            "0xbf74483DB914192bb0a9577f3d8Fb29a6d4c08eE".to_string(),
            "0x8ac28b06fC1eEAA8646c0d8A5e835B96e93D6799".to_string(),
            "0xdb2BA58f1CB7b10698A9Be268cB846809F0B05e4".to_string(),
            "0x17Faf610A5538DB09282650596B4B7858195e32E".to_string(),
        ]
    }

    #[test]
    fn ordering_is_normalized_and_sorted() {
        let set = MembershipSet::new(&sample_identities()).unwrap();
        let mut expected: Vec<String> = sample_identities()
            .iter()
            .map(|id| id.to_lowercase())
            .collect();
        expected.sort();
        assert_eq!(set.identities(), expected.as_slice());
    }

    #[test]
    fn index_lookup_is_case_insensitive() {
        let set = MembershipSet::new(&sample_identities()).unwrap();
        let index = set
            .index_of("0xBF74483DB914192BB0A9577F3D8FB29A6D4C08EE")
            .unwrap();
        assert_eq!(
            set.identities()[index],
            "0xbf74483db914192bb0a9577f3d8fb29a6d4c08ee"
        );
    }

    #[test]
    fn missing_member_is_reported() {
        let set = MembershipSet::new(&sample_identities()).unwrap();
        assert!(matches!(
            set.index_of("0x0000000000000000000000000000000000000001"),
            Err(MerkleError::MemberNotFound(_))
        ));
    }

    #[test]
    fn member_proofs_verify_against_set_tree() {
        let hasher = NativeHasher::init();
        let set = MembershipSet::new(&sample_identities()).unwrap();
        let tree = set.tree(&hasher, MEMBERSHIP_TREE_DEPTH).unwrap();
        for identity in sample_identities() {
            let index = set.index_of(&identity).unwrap();
            let proof = tree.prove(index).unwrap();
            assert!(verify(&hasher, tree.root(), set.leaves()[index], &proof));
        }
    }

    #[test]
    fn garbage_identity_is_rejected() {
        let err = MembershipSet::new(&["not-an-address".to_string()]).unwrap_err();
        assert!(matches!(err, MerkleError::InvalidIdentity(_)));
    }
}
