//! Attestation witness assembly.
//!
//! Turns a validated claim into the complete set of private and public
//! values the corresponding circuit expects, and refuses to hand over any
//! witness that fails its own consistency checks: a witness that cannot be
//! re-verified locally would only fail later inside the circuit, after the
//! expensive part of proof generation has already been paid for.

pub mod builder;
pub mod claim;
pub mod message;
pub mod nullifier;
mod serde_util;
pub mod witness;

use thiserror::Error;
use zkcred_crypto::CryptoError;
use zkcred_merkle::MerkleError;

pub use builder::AttestationBuilder;
pub use claim::{BalanceClaim, EmailClaim, Erc721Claim, Network, PrecomputedSignature, SocialClaim};
pub use nullifier::SessionNonce;
pub use witness::{BalanceWitness, EmailWitness, Erc721Witness, SocialWitness};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WitnessError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Merkle(#[from] MerkleError),

    /// The claim itself is malformed or unprovable; no witness was built.
    #[error("invalid claim: {0}")]
    InvalidClaim(String),

    /// A built witness failed one of its consistency checks. The named
    /// sub-check is enough to diagnose without re-deriving any secrets.
    #[error("witness failed self-check: {check}")]
    Inconsistent { check: &'static str },
}
