//! Reformat an externally generated Groth16 proof into verifier calldata.
//!
//! The prover emits curve points as decimal-string coordinate triples in
//! projective form; the pairing-check verifier contract takes affine pairs,
//! with the G2 coordinate order inside each pair swapped. This crate only
//! reshapes values; it never checks the proof.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    /// A coordinate or public signal is not a decimal or 0x-hex integer.
    #[error("invalid scalar string: {0}")]
    InvalidScalar(String),

    /// The proof declares a protocol other than groth16.
    #[error("unsupported protocol: {0}")]
    UnsupportedProtocol(String),
}

/// A Groth16 proof as the external prover serializes it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Groth16Proof {
    pub pi_a: [String; 3],
    pub pi_b: [[String; 2]; 3],
    pub pi_c: [String; 3],
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub curve: Option<String>,
}

/// Calldata for a generic pairing-check verifier: three point groups plus
/// the flat public-input array, every scalar 0x-hex padded to 32 bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierCalldata {
    pub a: [String; 2],
    pub b: [[String; 2]; 2],
    pub c: [String; 2],
    pub input: Vec<String>,
}

fn quantize(scalar: &str) -> Result<String, ExportError> {
    let value = if let Some(stripped) = scalar.strip_prefix("0x") {
        BigUint::parse_bytes(stripped.as_bytes(), 16)
    } else {
        BigUint::parse_bytes(scalar.as_bytes(), 10)
    }
    .ok_or_else(|| ExportError::InvalidScalar(scalar.to_string()))?;
    Ok(format!("0x{:0>64}", value.to_str_radix(16)))
}

/// Split a proof and its public signals into verifier calldata.
pub fn to_calldata(
    proof: &Groth16Proof,
    public_signals: &[String],
) -> Result<VerifierCalldata, ExportError> {
    if let Some(protocol) = &proof.protocol {
        if protocol != "groth16" {
            return Err(ExportError::UnsupportedProtocol(protocol.clone()));
        }
    }

    let a = [quantize(&proof.pi_a[0])?, quantize(&proof.pi_a[1])?];
    // G2 points present each coordinate pair in reversed order on-chain.
    let b = [
        [quantize(&proof.pi_b[0][1])?, quantize(&proof.pi_b[0][0])?],
        [quantize(&proof.pi_b[1][1])?, quantize(&proof.pi_b[1][0])?],
    ];
    let c = [quantize(&proof.pi_c[0])?, quantize(&proof.pi_c[1])?];
    let input = public_signals
        .iter()
        .map(|signal| quantize(signal))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(VerifierCalldata { a, b, c, input })
}
