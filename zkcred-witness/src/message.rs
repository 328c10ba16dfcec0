//! Canonical message layouts, one per claim kind.
//!
//! The layouts are byte-for-byte contracts with the circuits: element order,
//! padding, and the attestation type tag are all fixed. Identical claims
//! always canonicalize to identical messages.

use halo2curves_axiom::bn256::Fr;
use num_bigint::BigUint;
use zkcred_crypto::field::{bytes_to_elements, fr_from_biguint, fr_from_hex_str};

use crate::claim::Network;
use crate::WitnessError;

/// Attestation type tag for ownership attestations, the first message
/// element of every Merkle-rooted layout.
pub const ATTESTATION_TYPE_OWNERSHIP: u64 = 0;

/// Fixed width of the email-domain message; shorter domains are
/// right-zero-padded.
pub const MAX_DOMAIN_LENGTH: usize = 90;

/// Number of elements in the balance attestation message.
pub const BALANCE_MESSAGE_LEN: usize = 5;

/// `[type, ownersMerkleRoot, tokenAddress, networkByte, threshold]`.
pub fn balance_message(
    owners_merkle_root: Fr,
    token_address: &str,
    network: Network,
    threshold: &BigUint,
) -> Result<[Fr; BALANCE_MESSAGE_LEN], WitnessError> {
    let token = fr_from_hex_str(token_address)?;
    Ok([
        Fr::from(ATTESTATION_TYPE_OWNERSHIP),
        owners_merkle_root,
        token,
        Fr::from(network.byte() as u64),
        fr_from_biguint(threshold),
    ])
}

/// `[type, ownersMerkleRoot, ...UTF-8 bytes of the service name]`.
pub fn social_message(owners_merkle_root: Fr, service: &str) -> Vec<Fr> {
    let mut message = vec![Fr::from(ATTESTATION_TYPE_OWNERSHIP), owners_merkle_root];
    message.extend(bytes_to_elements(service.as_bytes()));
    message
}

/// UTF-8 bytes of `"<address>owns<token>"`, exactly as provided by the
/// caller (no case normalization; the claim string is what gets signed).
pub fn erc721_message(subject_address: &str, token_address: &str) -> Vec<u8> {
    format!("{subject_address}owns{token_address}").into_bytes()
}

/// The domain right-zero-padded to [`MAX_DOMAIN_LENGTH`] bytes.
pub fn email_message(domain: &str) -> Result<Vec<u8>, WitnessError> {
    if domain.len() > MAX_DOMAIN_LENGTH {
        return Err(WitnessError::InvalidClaim(format!(
            "domain exceeds {MAX_DOMAIN_LENGTH} bytes"
        )));
    }
    let mut message = domain.as_bytes().to_vec();
    message.resize(MAX_DOMAIN_LENGTH, 0);
    Ok(message)
}
