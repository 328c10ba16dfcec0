//! Poseidon hashing over the circuit's native field.
//!
//! The permutation itself comes from `poseidon-primitives`; this module only
//! fixes the parameters and exposes the two profiles the witness pipeline
//! needs: fixed-arity compression (Merkle nodes, signature challenges) and
//! variable-length absorption (message digests, nullifiers). The two
//! variable-length profiles are separated by their capacity tag so a value
//! computed as a message digest can never collide with one computed as a
//! nullifier.

use halo2curves_axiom::bn256::Fr;
use halo2curves_axiom::ff::Field;
use poseidon_primitives::poseidon::primitives::{
    ConstantLength, Hash as PoseidonHash, Spec, VariableLengthIden3,
};

use crate::field::bytes_to_elements;

const POSEIDON_T: usize = 6;
const POSEIDON_RATE: usize = 5;
const POSEIDON_FULL_ROUNDS: usize = 8;
const POSEIDON_PARTIAL_ROUNDS: usize = 57;

/// Capacity tag of the message-digest profile.
const DIGEST_CAPACITY: u128 = 1u128 << 64;
/// Capacity tag of the nullifier sponge profile.
const SPONGE_CAPACITY: u128 = 1u128 << 65;

#[derive(Debug)]
struct ZkPoseidonSpec;

impl Spec<Fr, POSEIDON_T, POSEIDON_RATE> for ZkPoseidonSpec {
    fn full_rounds() -> usize {
        POSEIDON_FULL_ROUNDS
    }

    fn partial_rounds() -> usize {
        POSEIDON_PARTIAL_ROUNDS
    }

    fn sbox(val: Fr) -> Fr {
        val.pow_vartime([5])
    }

    fn secure_mds() -> usize {
        0
    }
}

/// Handle to the initialized native-field hash primitive.
///
/// Constructed once per process via [`NativeHasher::init`] and passed
/// explicitly to every component that hashes; all methods are pure.
#[derive(Clone, Copy, Debug)]
pub struct NativeHasher {
    _private: (),
}

impl NativeHasher {
    /// Initialize the hashing capability. Idempotent and cheap; kept as an
    /// explicit step so no component hashes through an ambient global.
    pub fn init() -> Self {
        Self { _private: () }
    }

    /// Fixed-arity compression hash.
    pub fn compress<const L: usize>(&self, values: [Fr; L]) -> Fr {
        PoseidonHash::<Fr, ZkPoseidonSpec, ConstantLength<L>, POSEIDON_T, POSEIDON_RATE>::init()
            .hash(values)
    }

    /// Variable-length message digest.
    pub fn digest(&self, elements: &[Fr]) -> Fr {
        PoseidonHash::<Fr, ZkPoseidonSpec, VariableLengthIden3, POSEIDON_T, POSEIDON_RATE>::init()
            .hash_with_cap(elements, DIGEST_CAPACITY)
    }

    /// Variable-length absorb-many/squeeze-one sponge used for nullifier
    /// derivation. Domain-separated from [`NativeHasher::digest`].
    pub fn sponge(&self, elements: &[Fr]) -> Fr {
        PoseidonHash::<Fr, ZkPoseidonSpec, VariableLengthIden3, POSEIDON_T, POSEIDON_RATE>::init()
            .hash_with_cap(elements, SPONGE_CAPACITY)
    }

    /// Digest raw bytes, promoting each byte to a field element first.
    pub fn digest_bytes(&self, bytes: &[u8]) -> Fr {
        self.digest(&bytes_to_elements(bytes))
    }
}
