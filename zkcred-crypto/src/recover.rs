//! Auxiliary-point recovery for secp256k1 signatures.
//!
//! A circuit with no native secp256k1 arithmetic verifies an ECDSA signature
//! (r, s) over digest m through the precomputed point U = w*G with
//! w = -(r^-1 * m) mod n: the remaining in-circuit work is one scalar
//! multiplication and one addition, with no modular inversion. U depends only
//! on (r, m), never on s.

use k256::ecdsa::hazmat::SignPrimitive;
use k256::ecdsa::{SigningKey as EcdsaSigningKey, VerifyingKey as EcdsaVerifyingKey};
use k256::elliptic_curve::bigint::U256;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::{Field, PrimeField};
use k256::{FieldBytes, ProjectivePoint, Scalar};
use sha2::Sha256;
use sha3::{Digest, Keccak256};

use crate::error::CryptoError;
use crate::limbs::to_registers_64x4;

/// An affine secp256k1 point as raw big-endian coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Secp256k1Point {
    pub x: [u8; 32],
    pub y: [u8; 32],
}

impl Secp256k1Point {
    /// Both coordinates in the circuit's 64-bit x 4 register convention.
    pub fn registers(&self) -> [[u64; 4]; 2] {
        [to_registers_64x4(&self.x), to_registers_64x4(&self.y)]
    }
}

/// Recover U = -(r^-1 * digest) * G.
///
/// Fails with [`CryptoError::NotInvertible`] when r has no inverse modulo the
/// curve order, and with [`CryptoError::InvalidScalar`] when r is not a
/// canonical scalar encoding.
pub fn recover_u_point(r: &[u8; 32], digest: &[u8; 32]) -> Result<Secp256k1Point, CryptoError> {
    let r_scalar = Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(*r)))
        .ok_or(CryptoError::InvalidScalar)?;
    let r_inv =
        Option::<Scalar>::from(r_scalar.invert()).ok_or(CryptoError::NotInvertible)?;
    let z = <Scalar as Reduce<U256>>::from_be_bytes_reduced(FieldBytes::from(*digest));
    let w = -(r_inv * z);
    let u = (ProjectivePoint::GENERATOR * w).to_affine();
    let encoded = u.to_encoded_point(false);
    let mut point = Secp256k1Point {
        x: [0u8; 32],
        y: [0u8; 32],
    };
    point.x.copy_from_slice(
        encoded
            .x()
            .ok_or(CryptoError::InvalidEncoding("recovered point x coordinate"))?,
    );
    point.y.copy_from_slice(
        encoded
            .y()
            .ok_or(CryptoError::InvalidEncoding("recovered point y coordinate"))?,
    );
    Ok(point)
}

/// Keccak-256 digest of the Ethereum personal-message envelope.
pub fn personal_message_digest(message: &str) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(format!("\x19Ethereum Signed Message:\n{}", message.len()).as_bytes());
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

/// Deterministically sign a 32-byte prehash, returning (r, s).
///
/// RFC 6979 nonces keep fixtures reproducible. This is the fixture-side
/// counterpart of [`recover_u_point`], not a general signing facility.
pub fn sign_prehash(
    signing_key: &EcdsaSigningKey,
    digest: &[u8; 32],
) -> Result<([u8; 32], [u8; 32]), CryptoError> {
    let scalar = signing_key.as_nonzero_scalar();
    let mut field_bytes = FieldBytes::default();
    field_bytes.copy_from_slice(digest);
    let (signature, _) = scalar
        .try_sign_prehashed_rfc6979::<Sha256>(field_bytes, b"")
        .map_err(|_| CryptoError::InvalidScalar)?;
    let bytes = signature.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..]);
    Ok((r, s))
}

/// Extract the uncompressed public-key coordinates of a signing key.
pub fn public_key_coordinates(signing_key: &EcdsaSigningKey) -> Result<Secp256k1Point, CryptoError> {
    let verifying_key = EcdsaVerifyingKey::from(signing_key);
    let encoded = verifying_key.to_encoded_point(false);
    let mut point = Secp256k1Point {
        x: [0u8; 32],
        y: [0u8; 32],
    };
    point.x.copy_from_slice(
        encoded
            .x()
            .ok_or(CryptoError::InvalidEncoding("public key x coordinate"))?,
    );
    point.y.copy_from_slice(
        encoded
            .y()
            .ok_or(CryptoError::InvalidEncoding("public key y coordinate"))?,
    );
    Ok(point)
}

/// The Ethereum address of a signing key (Keccak-256 of the public key).
pub fn ethereum_address(signing_key: &EcdsaSigningKey) -> Result<String, CryptoError> {
    let point = public_key_coordinates(signing_key)?;
    let mut hasher = Keccak256::new();
    hasher.update(point.x);
    hasher.update(point.y);
    let digest = hasher.finalize();
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    Ok(format!("0x{}", hex::encode(address)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_key() -> EcdsaSigningKey {
        EcdsaSigningKey::from_bytes(FieldBytes::from_slice(&[7u8; 32]))
            .expect("fixture key bytes")
    }

    #[test]
    fn recovery_is_deterministic_and_ignores_s() {
        let key = fixture_key();
        let digest = personal_message_digest("attestation fixture");
        let (r, _s) = sign_prehash(&key, &digest).unwrap();
        let first = recover_u_point(&r, &digest).unwrap();
        let second = recover_u_point(&r, &digest).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn recovery_depends_on_digest() {
        let key = fixture_key();
        let digest_a = personal_message_digest("message a");
        let digest_b = personal_message_digest("message b");
        let (r, _) = sign_prehash(&key, &digest_a).unwrap();
        assert_ne!(
            recover_u_point(&r, &digest_a).unwrap(),
            recover_u_point(&r, &digest_b).unwrap()
        );
    }

    #[test]
    fn zero_r_is_not_invertible() {
        let digest = personal_message_digest("anything");
        assert_eq!(
            recover_u_point(&[0u8; 32], &digest),
            Err(CryptoError::NotInvertible)
        );
    }

    #[test]
    fn verification_identity_holds() {
        let key = fixture_key();
        let digest = personal_message_digest("identity check");
        let (r, _s) = sign_prehash(&key, &digest).unwrap();
        let u = recover_u_point(&r, &digest).unwrap();

        let r_scalar =
            Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(r))).unwrap();
        let z = <Scalar as Reduce<U256>>::from_be_bytes_reduced(FieldBytes::from(digest));
        let w = -(r_scalar.invert().unwrap() * z);
        let expected = (ProjectivePoint::GENERATOR * w).to_affine().to_encoded_point(false);
        assert_eq!(&u.x[..], expected.x().unwrap().as_slice());
        assert_eq!(&u.y[..], expected.y().unwrap().as_slice());
    }

    #[test]
    fn registers_are_least_significant_first() {
        let key = fixture_key();
        let digest = personal_message_digest("registers");
        let (r, _) = sign_prehash(&key, &digest).unwrap();
        let u = recover_u_point(&r, &digest).unwrap();
        let [x_regs, _] = u.registers();
        let reassembled = crate::limbs::from_registers_64x4(&x_regs);
        assert_eq!(reassembled, u.x);
    }

    #[test]
    fn ethereum_address_is_checksummed_length() {
        let address = ethereum_address(&fixture_key()).unwrap();
        assert_eq!(address.len(), 42);
        assert!(address.starts_with("0x"));
    }
}
