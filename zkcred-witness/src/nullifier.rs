//! Nullifier derivation.
//!
//! Two conventions coexist and are not interchangeable. The session
//! convention hashes a per-session random scalar pair, so replay resistance
//! is scoped to the session. The identity convention hashes the claimant's
//! persistent signature material (the recovered auxiliary point, bound to
//! their signing key) with fixed domain constants and the claimant address,
//! so repeated proofs of the same fact by the same identity collide on
//! purpose and duplicates can be detected.

use halo2curves_axiom::bn256::Fr;
use halo2curves_axiom::ff::Field;
use rand::RngCore;
use zkcred_crypto::recover::Secp256k1Point;
use zkcred_crypto::NativeHasher;

/// Domain constants mixed into every identity-bound nullifier.
pub const IDENTITY_DOMAIN: [u64; 2] = [69, 420];

/// A per-session random scalar pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionNonce {
    pub r2: Fr,
    pub s2: Fr,
}

impl SessionNonce {
    pub fn new(r2: Fr, s2: Fr) -> Self {
        Self { r2, s2 }
    }

    /// Draw a fresh nonce pair. Only witness construction is randomized;
    /// everything derived from the nonce is deterministic.
    pub fn from_entropy<R: RngCore>(rng: &mut R) -> Self {
        Self {
            r2: Fr::random(&mut *rng),
            s2: Fr::random(&mut *rng),
        }
    }

    pub fn elements(&self) -> [Fr; 2] {
        [self.r2, self.s2]
    }
}

/// Session-scoped nullifier: sponge over the nonce pair.
pub fn session_nullifier(hasher: &NativeHasher, nonce: &SessionNonce) -> Fr {
    hasher.sponge(&nonce.elements())
}

/// Identity-bound nullifier: sponge over the signature scalar registers, the
/// auxiliary-point registers, the claimant address, and the domain constants.
pub fn identity_nullifier(
    hasher: &NativeHasher,
    s_registers: &[u64; 4],
    u_registers: &[[u64; 4]; 2],
    subject_address: Fr,
) -> Fr {
    let mut elements = Vec::with_capacity(15);
    elements.extend(s_registers.iter().map(|r| Fr::from(*r)));
    elements.extend(u_registers[0].iter().map(|r| Fr::from(*r)));
    elements.extend(u_registers[1].iter().map(|r| Fr::from(*r)));
    elements.push(subject_address);
    elements.extend(IDENTITY_DOMAIN.iter().map(|d| Fr::from(*d)));
    hasher.sponge(&elements)
}

/// The commitment a claimant inserts into the precomputed-signature set:
/// digest over the signature scalar, auxiliary point, and public key, all in
/// register form.
pub fn identity_commitment(
    hasher: &NativeHasher,
    s_registers: &[u64; 4],
    u: &Secp256k1Point,
    pubkey: &Secp256k1Point,
) -> Fr {
    let u_registers = u.registers();
    let pk_registers = pubkey.registers();
    let mut elements = Vec::with_capacity(20);
    elements.extend(s_registers.iter().map(|r| Fr::from(*r)));
    elements.extend(u_registers[0].iter().map(|r| Fr::from(*r)));
    elements.extend(u_registers[1].iter().map(|r| Fr::from(*r)));
    elements.extend(pk_registers[0].iter().map(|r| Fr::from(*r)));
    elements.extend(pk_registers[1].iter().map(|r| Fr::from(*r)));
    hasher.digest(&elements)
}
