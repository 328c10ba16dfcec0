//! Witness objects, one per claim kind.
//!
//! Field names and value forms are the external circuits' declared signal
//! names; scalars serialize as decimal strings, byte and bit sequences as
//! small integers. Each witness can re-verify itself: the builder runs the
//! check before hand-off, and tests use it as the local stand-in for the
//! circuit's own assertions.

use halo2curves_axiom::bn256::Fr;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use zkcred_crypto::babyjubjub::Point;
use zkcred_crypto::eddsa::{Signature, VerifyingKey};
use zkcred_crypto::field::fr_to_biguint;
use zkcred_crypto::limbs::from_registers_64x4;
use zkcred_crypto::recover::Secp256k1Point;
use zkcred_crypto::NativeHasher;
use zkcred_merkle::{verify as verify_merkle, MerkleProof};

use crate::claim::Network;
use crate::message::MAX_DOMAIN_LENGTH;
use crate::nullifier::{identity_commitment, identity_nullifier, session_nullifier, SessionNonce};
use crate::serde_util::{
    biguint_decimal, fr_decimal, fr_decimal_array, fr_decimal_vec, registers_decimal,
    registers_decimal_pair,
};
use crate::WitnessError;

fn check(condition: bool, name: &'static str) -> Result<(), WitnessError> {
    if condition {
        Ok(())
    } else {
        Err(WitnessError::Inconsistent { check: name })
    }
}

fn verify_eddsa(
    hasher: &NativeHasher,
    pub_key_x: Fr,
    pub_key_y: Fr,
    r8x: Fr,
    r8y: Fr,
    s: &BigUint,
    message: Fr,
    name: &'static str,
) -> Result<(), WitnessError> {
    let key = VerifyingKey::from_point(Point {
        x: pub_key_x,
        y: pub_key_y,
    });
    let signature = Signature {
        r8: Point { x: r8x, y: r8y },
        s: s.clone(),
    };
    let valid = key
        .verify(hasher, message, &signature)
        .map_err(|_| WitnessError::Inconsistent { check: name })?;
    check(valid, name)
}

/// Witness for a balance-threshold attestation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceWitness {
    #[serde(with = "fr_decimal")]
    pub address: Fr,
    #[serde(rename = "addressPubKeyX", with = "fr_decimal")]
    pub address_pub_key_x: Fr,
    #[serde(rename = "addressPubKeyY", with = "fr_decimal")]
    pub address_pub_key_y: Fr,
    #[serde(rename = "addressR8x", with = "fr_decimal")]
    pub address_r8x: Fr,
    #[serde(rename = "addressR8y", with = "fr_decimal")]
    pub address_r8y: Fr,
    #[serde(rename = "addressS", with = "biguint_decimal")]
    pub address_s: BigUint,
    #[serde(rename = "balanceMessage", with = "fr_decimal_array")]
    pub balance_message: [Fr; 5],
    #[serde(rename = "balancePubKeyX", with = "fr_decimal")]
    pub balance_pub_key_x: Fr,
    #[serde(rename = "balancePubKeyY", with = "fr_decimal")]
    pub balance_pub_key_y: Fr,
    #[serde(rename = "balanceR8x", with = "fr_decimal")]
    pub balance_r8x: Fr,
    #[serde(rename = "balanceR8y", with = "fr_decimal")]
    pub balance_r8y: Fr,
    #[serde(rename = "balanceS", with = "biguint_decimal")]
    pub balance_s: BigUint,
    #[serde(rename = "pathIndices")]
    pub path_indices: Vec<u8>,
    #[serde(with = "fr_decimal_vec")]
    pub siblings: Vec<Fr>,
    #[serde(with = "fr_decimal_array")]
    pub nonce: [Fr; 2],
    #[serde(with = "fr_decimal")]
    pub nullifier: Fr,
}

impl BalanceWitness {
    /// Re-verify every relation the circuit will assert.
    pub fn self_check(&self, hasher: &NativeHasher) -> Result<(), WitnessError> {
        let root = self.balance_message[1];
        let proof = MerkleProof {
            root,
            siblings: self.siblings.clone(),
            path_indices: self.path_indices.clone(),
        };
        check(
            verify_merkle(hasher, root, self.address, &proof),
            "owners merkle root",
        )?;

        let network_byte = fr_to_biguint(&self.balance_message[3]);
        let network_byte = u8::try_from(&network_byte)
            .ok()
            .and_then(Network::from_byte);
        check(network_byte.is_some(), "network byte")?;

        verify_eddsa(
            hasher,
            self.address_pub_key_x,
            self.address_pub_key_y,
            self.address_r8x,
            self.address_r8y,
            &self.address_s,
            hasher.digest(&[self.address]),
            "address signature",
        )?;

        verify_eddsa(
            hasher,
            self.balance_pub_key_x,
            self.balance_pub_key_y,
            self.balance_r8x,
            self.balance_r8y,
            &self.balance_s,
            hasher.digest(&self.balance_message),
            "balance signature",
        )?;

        let nonce = SessionNonce::new(self.nonce[0], self.nonce[1]);
        check(
            self.nullifier == session_nullifier(hasher, &nonce),
            "nullifier",
        )
    }
}

/// Witness for an ERC-721 ownership attestation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Erc721Witness {
    pub message: Vec<u8>,
    #[serde(rename = "tokenAddress")]
    pub token_address: Vec<u8>,
    #[serde(rename = "pubKeyX", with = "fr_decimal")]
    pub pub_key_x: Fr,
    #[serde(rename = "pubKeyY", with = "fr_decimal")]
    pub pub_key_y: Fr,
    #[serde(rename = "R8x", with = "fr_decimal")]
    pub r8x: Fr,
    #[serde(rename = "R8y", with = "fr_decimal")]
    pub r8y: Fr,
    #[serde(rename = "S", with = "biguint_decimal")]
    pub s: BigUint,
    #[serde(rename = "M", with = "fr_decimal")]
    pub m: Fr,
    #[serde(with = "fr_decimal_array")]
    pub nonce: [Fr; 2],
    #[serde(with = "fr_decimal")]
    pub nullifier: Fr,
}

impl Erc721Witness {
    pub fn self_check(&self, hasher: &NativeHasher) -> Result<(), WitnessError> {
        let token_len = self.token_address.len();
        check(
            self.message.len() > token_len + 4,
            "claim string shape",
        )?;
        let owns_start = self.message.len() - token_len - 4;
        check(
            &self.message[owns_start..owns_start + 4] == b"owns",
            "claim string shape",
        )?;
        check(
            self.message[owns_start + 4..] == self.token_address[..],
            "token address binding",
        )?;
        check(self.m == hasher.digest_bytes(&self.message), "message digest")?;
        verify_eddsa(
            hasher,
            self.pub_key_x,
            self.pub_key_y,
            self.r8x,
            self.r8y,
            &self.s,
            self.m,
            "signature",
        )?;
        let nonce = SessionNonce::new(self.nonce[0], self.nonce[1]);
        check(
            self.nullifier == session_nullifier(hasher, &nonce),
            "nullifier",
        )
    }
}

/// Witness for an email-domain attestation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmailWitness {
    pub message: Vec<u8>,
    #[serde(rename = "pubKeyX", with = "fr_decimal")]
    pub pub_key_x: Fr,
    #[serde(rename = "pubKeyY", with = "fr_decimal")]
    pub pub_key_y: Fr,
    #[serde(rename = "R8x", with = "fr_decimal")]
    pub r8x: Fr,
    #[serde(rename = "R8y", with = "fr_decimal")]
    pub r8y: Fr,
    #[serde(rename = "S", with = "biguint_decimal")]
    pub s: BigUint,
    #[serde(with = "fr_decimal_array")]
    pub nonce: [Fr; 2],
    #[serde(with = "fr_decimal")]
    pub nullifier: Fr,
}

impl EmailWitness {
    pub fn self_check(&self, hasher: &NativeHasher) -> Result<(), WitnessError> {
        check(self.message.len() == MAX_DOMAIN_LENGTH, "domain padding")?;
        verify_eddsa(
            hasher,
            self.pub_key_x,
            self.pub_key_y,
            self.r8x,
            self.r8y,
            &self.s,
            hasher.digest_bytes(&self.message),
            "signature",
        )?;
        let nonce = SessionNonce::new(self.nonce[0], self.nonce[1]);
        check(
            self.nullifier == session_nullifier(hasher, &nonce),
            "nullifier",
        )
    }
}

/// Witness for a social-identity attestation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SocialWitness {
    #[serde(rename = "sealHubU", with = "registers_decimal_pair")]
    pub seal_hub_u: [[u64; 4]; 2],
    #[serde(rename = "sealHubS", with = "registers_decimal")]
    pub seal_hub_s: [u64; 4],
    #[serde(rename = "sealHubPubKey", with = "registers_decimal_pair")]
    pub seal_hub_pub_key: [[u64; 4]; 2],
    #[serde(rename = "sealHubAddress", with = "fr_decimal")]
    pub seal_hub_address: Fr,
    #[serde(rename = "sealHubPathIndices")]
    pub seal_hub_path_indices: Vec<u8>,
    #[serde(rename = "sealHubSiblings", with = "fr_decimal_vec")]
    pub seal_hub_siblings: Vec<Fr>,
    #[serde(rename = "sealHubMerkleRoot", with = "fr_decimal")]
    pub seal_hub_merkle_root: Fr,
    #[serde(rename = "farcasterMessage", with = "fr_decimal_vec")]
    pub attestation_message: Vec<Fr>,
    #[serde(rename = "farcasterPubKeyX", with = "fr_decimal")]
    pub attestation_pub_key_x: Fr,
    #[serde(rename = "farcasterPubKeyY", with = "fr_decimal")]
    pub attestation_pub_key_y: Fr,
    #[serde(rename = "farcasterR8x", with = "fr_decimal")]
    pub attestation_r8x: Fr,
    #[serde(rename = "farcasterR8y", with = "fr_decimal")]
    pub attestation_r8y: Fr,
    #[serde(rename = "farcasterS", with = "biguint_decimal")]
    pub attestation_s: BigUint,
    #[serde(rename = "ownersPathIndices")]
    pub owners_path_indices: Vec<u8>,
    #[serde(rename = "ownersSiblings", with = "fr_decimal_vec")]
    pub owners_siblings: Vec<Fr>,
    #[serde(with = "fr_decimal")]
    pub nullifier: Fr,
}

impl SocialWitness {
    pub fn self_check(&self, hasher: &NativeHasher) -> Result<(), WitnessError> {
        check(
            self.attestation_message.len() > 2,
            "attestation message shape",
        )?;
        let owners_root = self.attestation_message[1];
        let owners_proof = MerkleProof {
            root: owners_root,
            siblings: self.owners_siblings.clone(),
            path_indices: self.owners_path_indices.clone(),
        };
        check(
            verify_merkle(hasher, owners_root, self.seal_hub_address, &owners_proof),
            "owners merkle root",
        )?;

        verify_eddsa(
            hasher,
            self.attestation_pub_key_x,
            self.attestation_pub_key_y,
            self.attestation_r8x,
            self.attestation_r8y,
            &self.attestation_s,
            hasher.digest(&self.attestation_message),
            "attestation signature",
        )?;

        let u = Secp256k1Point {
            x: from_registers_64x4(&self.seal_hub_u[0]),
            y: from_registers_64x4(&self.seal_hub_u[1]),
        };
        let pubkey = Secp256k1Point {
            x: from_registers_64x4(&self.seal_hub_pub_key[0]),
            y: from_registers_64x4(&self.seal_hub_pub_key[1]),
        };
        let commitment = identity_commitment(hasher, &self.seal_hub_s, &u, &pubkey);
        let commitment_proof = MerkleProof {
            root: self.seal_hub_merkle_root,
            siblings: self.seal_hub_siblings.clone(),
            path_indices: self.seal_hub_path_indices.clone(),
        };
        check(
            verify_merkle(
                hasher,
                self.seal_hub_merkle_root,
                commitment,
                &commitment_proof,
            ),
            "commitment membership",
        )?;

        check(
            self.nullifier
                == identity_nullifier(
                    hasher,
                    &self.seal_hub_s,
                    &self.seal_hub_u,
                    self.seal_hub_address,
                ),
            "nullifier",
        )
    }
}
