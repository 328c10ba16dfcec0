//! Deterministic EdDSA over Baby Jubjub.
//!
//! Key and nonce expansion use the blake3 XOF; the challenge is a fixed-arity
//! Poseidon hash of (R8, A, M). Identical key and message always produce the
//! identical signature, which keeps generated witness fixtures reproducible.

use halo2curves_axiom::bn256::Fr;
use halo2curves_axiom::ff::PrimeField;
use num_bigint::BigUint;

use crate::babyjubjub::{base_point, Point, SUBGROUP_ORDER};
use crate::error::CryptoError;
use crate::field::fr_to_biguint;
use crate::poseidon::NativeHasher;

const EXPANDED_SEED_LEN: usize = 64;
const NONCE_DOMAIN: &[u8] = b"zkcred-eddsa-nonce";

/// A private Baby Jubjub signing key with its derived public point.
#[derive(Clone, Debug)]
pub struct SigningKey {
    scalar: BigUint,
    nonce_key: [u8; 32],
    public: Point,
}

/// The public half of a signing key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerifyingKey {
    point: Point,
}

/// An EdDSA signature: commitment point and response scalar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub r8: Point,
    pub s: BigUint,
}

fn expand_seed(seed: &[u8]) -> [u8; EXPANDED_SEED_LEN] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(seed);
    let mut expanded = [0u8; EXPANDED_SEED_LEN];
    hasher.finalize_xof().fill(&mut expanded);
    expanded
}

impl SigningKey {
    /// Derive a signing key from seed bytes.
    ///
    /// The first half of the XOF expansion is pruned Ed25519-style and
    /// reduced modulo the subgroup order; the second half keys the
    /// deterministic nonce.
    pub fn from_seed(seed: &[u8]) -> Self {
        let expanded = expand_seed(seed);
        let mut pruned = [0u8; 32];
        pruned.copy_from_slice(&expanded[..32]);
        pruned[0] &= 0xf8;
        pruned[31] &= 0x7f;
        pruned[31] |= 0x40;
        let scalar = (BigUint::from_bytes_le(&pruned) >> 3u8) % &*SUBGROUP_ORDER;
        let mut nonce_key = [0u8; 32];
        nonce_key.copy_from_slice(&expanded[32..]);
        Self::from_parts(scalar, nonce_key)
    }

    /// Use an externally supplied private scalar.
    ///
    /// Rejects scalars that are zero or not reduced modulo the subgroup
    /// order; callers own reduction, this constructor never reduces silently.
    pub fn from_scalar(scalar: BigUint) -> Result<Self, CryptoError> {
        if scalar.bits() == 0 || scalar >= *SUBGROUP_ORDER {
            return Err(CryptoError::InvalidScalar);
        }
        let mut hasher = blake3::Hasher::new();
        hasher.update(NONCE_DOMAIN);
        hasher.update(&scalar.to_bytes_le());
        let mut nonce_key = [0u8; 32];
        hasher.finalize_xof().fill(&mut nonce_key);
        Ok(Self::from_parts(scalar, nonce_key))
    }

    fn from_parts(scalar: BigUint, nonce_key: [u8; 32]) -> Self {
        let public = base_point().mul_scalar(&scalar);
        Self {
            scalar,
            nonce_key,
            public,
        }
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey { point: self.public }
    }

    /// Sign a message digest.
    ///
    /// The nonce is blake3(nonce_key || digest) reduced modulo the subgroup
    /// order; the challenge is Poseidon(R8.x, R8.y, A.x, A.y, M).
    pub fn sign(&self, hasher: &NativeHasher, message: Fr) -> Signature {
        let mut nonce_input = blake3::Hasher::new();
        nonce_input.update(&self.nonce_key);
        nonce_input.update(message.to_repr().as_ref());
        let mut expanded = [0u8; EXPANDED_SEED_LEN];
        nonce_input.finalize_xof().fill(&mut expanded);
        let nonce = BigUint::from_bytes_le(&expanded) % &*SUBGROUP_ORDER;

        let r8 = base_point().mul_scalar(&nonce);
        let challenge = challenge_scalar(hasher, &r8, &self.public, message);
        let s = (nonce + challenge * &self.scalar) % &*SUBGROUP_ORDER;
        Signature { r8, s }
    }
}

impl VerifyingKey {
    /// Reconstruct a verifying key from raw coordinates, e.g. out of a
    /// serialized witness. On-curve validation happens in `verify`.
    pub fn from_point(point: Point) -> Self {
        Self { point }
    }

    pub fn point(&self) -> Point {
        self.point
    }

    /// Check S*B8 == R8 + challenge*A.
    pub fn verify(
        &self,
        hasher: &NativeHasher,
        message: Fr,
        signature: &Signature,
    ) -> Result<bool, CryptoError> {
        if signature.s >= *SUBGROUP_ORDER {
            return Err(CryptoError::InvalidScalar);
        }
        if !self.point.is_on_curve() || !signature.r8.is_on_curve() {
            return Err(CryptoError::InvalidPoint);
        }
        let challenge = challenge_scalar(hasher, &signature.r8, &self.point, message);
        let lhs = base_point().mul_scalar(&signature.s);
        let rhs = signature.r8.add(&self.point.mul_scalar(&challenge));
        Ok(lhs == rhs)
    }
}

impl From<&SigningKey> for VerifyingKey {
    fn from(sk: &SigningKey) -> Self {
        sk.verifying_key()
    }
}

fn challenge_scalar(hasher: &NativeHasher, r8: &Point, public: &Point, message: Fr) -> BigUint {
    let challenge = hasher.compress([r8.x, r8.y, public.x, public.y, message]);
    fr_to_biguint(&challenge)
}
