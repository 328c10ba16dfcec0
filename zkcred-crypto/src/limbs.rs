//! Fixed-width limb decomposition for non-native field arithmetic.
//!
//! Circuits that reason about secp256k1 values cannot represent them in one
//! native field element, so coordinates and scalars are split into `k` limbs
//! of `n` bits each ("registers"). Two register conventions are in use and
//! both are fixed by the consuming circuits: 86-bit x 3 for field-element
//! payloads and 64-bit x 4 for secp256k1 coordinates.

use halo2curves_axiom::bn256::Fr;
use num_bigint::BigUint;

use crate::error::CryptoError;
use crate::field::fr_from_biguint;

/// Number of limbs in the field-element payload convention.
pub const PAYLOAD_REGISTERS: usize = 3;
/// Limb width of the field-element payload convention.
pub const PAYLOAD_REGISTER_BITS: usize = 86;

/// Split `value` into `limb_count` limbs of `limb_bits` bits, limb 0 least
/// significant.
pub fn encode(
    value: &BigUint,
    limb_bits: usize,
    limb_count: usize,
) -> Result<Vec<BigUint>, CryptoError> {
    let bound = BigUint::from(1u8) << (limb_bits * limb_count);
    if *value >= bound {
        return Err(CryptoError::OutOfRange {
            limb_bits,
            limb_count,
        });
    }
    let mask = (BigUint::from(1u8) << limb_bits) - 1u8;
    let mut rest = value.clone();
    let mut limbs = Vec::with_capacity(limb_count);
    for _ in 0..limb_count {
        limbs.push(&rest & &mask);
        rest >>= limb_bits;
    }
    Ok(limbs)
}

/// Fold limbs (limb 0 least significant) back into the integer they encode.
pub fn decode(limbs: &[BigUint], limb_bits: usize) -> BigUint {
    limbs
        .iter()
        .rev()
        .fold(BigUint::from(0u8), |acc, limb| (acc << limb_bits) + limb)
}

/// 86-bit x 3 registers for a field-element payload, register 0 least
/// significant, each register itself a native field element.
pub fn to_registers_86x3(value: &BigUint) -> Result<[Fr; 3], CryptoError> {
    let limbs = encode(value, PAYLOAD_REGISTER_BITS, PAYLOAD_REGISTERS)?;
    Ok([
        fr_from_biguint(&limbs[0]),
        fr_from_biguint(&limbs[1]),
        fr_from_biguint(&limbs[2]),
    ])
}

/// 64-bit x 4 registers for a 32-byte big-endian secp256k1 coordinate.
///
/// The coordinate is sliced into four big-endian 64-bit limbs and the limb
/// order is then reversed, so register 0 holds the least significant limb.
/// This mirrors the consuming circuit's register layout exactly.
pub fn to_registers_64x4(coordinate: &[u8; 32]) -> [u64; 4] {
    let mut registers = [0u64; 4];
    for (slot, chunk) in coordinate.chunks_exact(8).enumerate() {
        let mut limb = [0u8; 8];
        limb.copy_from_slice(chunk);
        registers[3 - slot] = u64::from_be_bytes(limb);
    }
    registers
}

/// Reassemble a 32-byte big-endian coordinate from its 64-bit registers.
pub fn from_registers_64x4(registers: &[u64; 4]) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (slot, register) in registers.iter().rev().enumerate() {
        out[slot * 8..(slot + 1) * 8].copy_from_slice(&register.to_be_bytes());
    }
    out
}
