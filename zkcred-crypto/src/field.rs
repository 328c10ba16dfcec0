//! Conversions between the circuit's native field and external integer forms.

use halo2curves_axiom::bn256::Fr;
use halo2curves_axiom::ff::{Field, PrimeField};
use num_bigint::BigUint;

use crate::error::CryptoError;

/// Fold big-endian bytes into a field element, reducing modulo the field.
pub fn fr_from_be_bytes_reduced(bytes: &[u8]) -> Fr {
    let mut acc = Fr::zero();
    let base = Fr::from(256);
    for byte in bytes {
        acc = acc * base + Fr::from(*byte as u64);
    }
    acc
}

/// Interpret a big integer as a field element, reducing modulo the field.
pub fn fr_from_biguint(value: &BigUint) -> Fr {
    fr_from_be_bytes_reduced(&value.to_bytes_be())
}

/// The canonical integer value of a field element.
pub fn fr_to_biguint(fr: &Fr) -> BigUint {
    BigUint::from_bytes_le(fr.to_repr().as_ref())
}

/// Render a field element as a decimal string (the witness-file scalar form).
pub fn fr_to_decimal(fr: &Fr) -> String {
    fr_to_biguint(fr).to_str_radix(10)
}

/// Parse a decimal string into a field element.
///
/// Values at or above the field modulus are rejected rather than reduced, so
/// witness files round-trip losslessly.
pub fn fr_from_decimal(s: &str) -> Result<Fr, CryptoError> {
    let value = BigUint::parse_bytes(s.as_bytes(), 10)
        .ok_or(CryptoError::InvalidEncoding("decimal field element"))?;
    if value >= fr_modulus() {
        return Err(CryptoError::InvalidEncoding("field element exceeds modulus"));
    }
    Ok(fr_from_biguint(&value))
}

/// The BN254 scalar-field modulus as an integer.
pub fn fr_modulus() -> BigUint {
    BigUint::parse_bytes(Fr::MODULUS.trim_start_matches("0x").as_bytes(), 16)
        .expect("field modulus constant parses")
}

/// Parse a 0x-prefixed hex string (an address or token address) into a field
/// element. Addresses are at most 20 bytes, so no reduction ever happens.
pub fn fr_from_hex_str(s: &str) -> Result<Fr, CryptoError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    let value = BigUint::parse_bytes(stripped.as_bytes(), 16)
        .ok_or(CryptoError::InvalidEncoding("hex scalar"))?;
    if value >= fr_modulus() {
        return Err(CryptoError::InvalidEncoding("hex scalar exceeds modulus"));
    }
    Ok(fr_from_biguint(&value))
}

/// Promote raw bytes to field elements one byte per element, the form the
/// circuits take UTF-8 message input in.
pub fn bytes_to_elements(bytes: &[u8]) -> Vec<Fr> {
    bytes.iter().map(|b| Fr::from(*b as u64)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn biguint_round_trip() {
        let value = BigUint::parse_bytes(b"123456789012345678901234567890", 10).unwrap();
        let fr = fr_from_biguint(&value);
        assert_eq!(fr_to_biguint(&fr), value);
    }

    #[test]
    fn decimal_round_trip() {
        let fr = Fr::from(987_654_321u64);
        let s = fr_to_decimal(&fr);
        assert_eq!(s, "987654321");
        assert_eq!(fr_from_decimal(&s).unwrap(), fr);
    }

    #[test]
    fn decimal_rejects_modulus() {
        let s = fr_modulus().to_str_radix(10);
        assert!(fr_from_decimal(&s).is_err());
    }

    #[test]
    fn address_parses_to_small_integer() {
        let fr = fr_from_hex_str("0xbf74483DB914192bb0a9577f3d8Fb29a6d4c08eE").unwrap();
        let expected =
            BigUint::parse_bytes(b"bf74483DB914192bb0a9577f3d8Fb29a6d4c08eE", 16).unwrap();
        assert_eq!(fr_to_biguint(&fr), expected);
    }

    #[test]
    fn byte_promotion_is_per_byte() {
        let elements = bytes_to_elements(b"owns");
        assert_eq!(elements.len(), 4);
        assert_eq!(elements[0], Fr::from(0x6f));
    }
}
