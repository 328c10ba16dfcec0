//! Claim configurations, one explicit struct per claim kind.
//!
//! Every field is required and validated up front; nothing defaults
//! implicitly, and no signing material lives anywhere but the parameters
//! threaded through the builder.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use zkcred_crypto::recover::Secp256k1Point;

use crate::message::MAX_DOMAIN_LENGTH;
use crate::serde_util::{biguint_decimal, hex_array_32};
use crate::WitnessError;

/// Network tag carried in balance attestations as a single message byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// The ASCII byte the circuit expects: `'m'` for mainnet, `'g'` for
    /// testnet.
    pub fn byte(&self) -> u8 {
        match self {
            Network::Mainnet => b'm',
            Network::Testnet => b'g',
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'm' => Some(Network::Mainnet),
            b'g' => Some(Network::Testnet),
            _ => None,
        }
    }
}

/// Proof of holding at least `threshold` units of a fungible asset while
/// being a member of the committed owner set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BalanceClaim {
    pub subject_address: String,
    pub token_address: String,
    pub network: Network,
    #[serde(with = "biguint_decimal")]
    pub threshold: BigUint,
    #[serde(with = "biguint_decimal")]
    pub balance: BigUint,
    pub owner_set: Vec<String>,
}

/// Proof of owning a specific non-fungible token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Erc721Claim {
    pub subject_address: String,
    pub token_address: String,
}

/// Proof of controlling an email domain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmailClaim {
    pub domain: String,
}

/// A standard secp256k1 ECDSA signature over a known digest, together with
/// the signer's public key; the raw material behind a social-identity claim.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PrecomputedSignature {
    #[serde(with = "hex_array_32")]
    pub r: [u8; 32],
    #[serde(with = "hex_array_32")]
    pub s: [u8; 32],
    #[serde(with = "hex_array_32")]
    pub digest: [u8; 32],
    #[serde(with = "hex_array_32")]
    pub pubkey_x: [u8; 32],
    #[serde(with = "hex_array_32")]
    pub pubkey_y: [u8; 32],
}

impl PrecomputedSignature {
    pub fn pubkey(&self) -> Secp256k1Point {
        Secp256k1Point {
            x: self.pubkey_x,
            y: self.pubkey_y,
        }
    }
}

/// Proof of a social-identity binding: the subject belongs to the authorized
/// owner set, and its signing key is committed in the precomputed-signature
/// set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SocialClaim {
    pub subject_address: String,
    /// Service name hashed into the attestation message, e.g. "farcaster".
    pub service: String,
    pub owner_set: Vec<String>,
    pub signature: PrecomputedSignature,
    /// Commitments already present in the precomputed-signature set, as
    /// decimal strings; the claimant's own commitment is appended by the
    /// builder.
    pub commitment_pool: Vec<String>,
}

fn validate_address(label: &str, address: &str) -> Result<(), WitnessError> {
    let stripped = address
        .strip_prefix("0x")
        .ok_or_else(|| WitnessError::InvalidClaim(format!("{label} must be 0x-prefixed")))?;
    if stripped.len() != 40 || !stripped.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WitnessError::InvalidClaim(format!(
            "{label} must be a 20-byte hex address"
        )));
    }
    Ok(())
}

fn validate_owner_set(owner_set: &[String], subject: &str) -> Result<(), WitnessError> {
    if owner_set.is_empty() {
        return Err(WitnessError::InvalidClaim("owner set is empty".to_string()));
    }
    for owner in owner_set {
        validate_address("owner set entry", owner)?;
    }
    let subject_lower = subject.to_lowercase();
    if !owner_set.iter().any(|o| o.to_lowercase() == subject_lower) {
        return Err(WitnessError::InvalidClaim(
            "subject address is not in the owner set".to_string(),
        ));
    }
    Ok(())
}

impl BalanceClaim {
    pub fn validate(&self) -> Result<(), WitnessError> {
        validate_address("subject address", &self.subject_address)?;
        validate_address("token address", &self.token_address)?;
        validate_owner_set(&self.owner_set, &self.subject_address)?;
        let bound = BigUint::from(1u8) << 256;
        if self.threshold >= bound || self.balance >= bound {
            return Err(WitnessError::InvalidClaim(
                "balance and threshold must fit in 256 bits".to_string(),
            ));
        }
        if self.balance < self.threshold {
            return Err(WitnessError::InvalidClaim(
                "balance below threshold".to_string(),
            ));
        }
        Ok(())
    }
}

impl Erc721Claim {
    pub fn validate(&self) -> Result<(), WitnessError> {
        validate_address("subject address", &self.subject_address)?;
        validate_address("token address", &self.token_address)
    }
}

impl EmailClaim {
    pub fn validate(&self) -> Result<(), WitnessError> {
        if self.domain.is_empty() {
            return Err(WitnessError::InvalidClaim("domain is empty".to_string()));
        }
        if self.domain.len() > MAX_DOMAIN_LENGTH {
            return Err(WitnessError::InvalidClaim(format!(
                "domain exceeds {MAX_DOMAIN_LENGTH} bytes"
            )));
        }
        Ok(())
    }
}

impl SocialClaim {
    pub fn validate(&self) -> Result<(), WitnessError> {
        validate_address("subject address", &self.subject_address)?;
        validate_owner_set(&self.owner_set, &self.subject_address)?;
        if self.service.is_empty() || !self.service.is_ascii() {
            return Err(WitnessError::InvalidClaim(
                "service name must be non-empty ASCII".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance_claim() -> BalanceClaim {
        BalanceClaim {
            subject_address: "0xbf74483DB914192bb0a9577f3d8Fb29a6d4c08eE".to_string(),
            token_address: "0x722B0676F457aFe13e479eB2a8A4De88BA15B2c6".to_string(),
            network: Network::Testnet,
            threshold: BigUint::from(1u8),
            balance: BigUint::from(5u8),
            owner_set: vec!["0xbf74483DB914192bb0a9577f3d8Fb29a6d4c08eE".to_string()],
        }
    }

    #[test]
    fn network_bytes_match_ascii() {
        assert_eq!(Network::Mainnet.byte(), 0x6d);
        assert_eq!(Network::Testnet.byte(), 0x67);
        assert_eq!(Network::from_byte(0x6d), Some(Network::Mainnet));
        assert_eq!(Network::from_byte(0x41), None);
    }

    #[test]
    fn valid_balance_claim_passes() {
        assert!(balance_claim().validate().is_ok());
    }

    #[test]
    fn balance_below_threshold_is_rejected() {
        let mut claim = balance_claim();
        claim.balance = BigUint::from(0u8);
        assert!(matches!(
            claim.validate(),
            Err(WitnessError::InvalidClaim(msg)) if msg.contains("below threshold")
        ));
    }

    #[test]
    fn subject_must_be_in_owner_set() {
        let mut claim = balance_claim();
        claim.owner_set = vec!["0x8ac28b06fC1eEAA8646c0d8A5e835B96e93D6799".to_string()];
        assert!(claim.validate().is_err());
    }

    #[test]
    fn malformed_address_is_rejected() {
        let mut claim = balance_claim();
        claim.subject_address = "bf74483DB914192bb0a9577f3d8Fb29a6d4c08eE".to_string();
        assert!(claim.validate().is_err());
    }

    #[test]
    fn oversized_domain_is_rejected() {
        let claim = EmailClaim {
            domain: "a".repeat(MAX_DOMAIN_LENGTH + 1),
        };
        assert!(claim.validate().is_err());
    }
}
