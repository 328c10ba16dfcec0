use thiserror::Error;

/// Errors produced by the cryptographic building blocks.
///
/// All of these are permanent input errors: retrying the same call with the
/// same arguments can never succeed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// A value does not fit the requested limb decomposition.
    #[error("value does not fit in {limb_count} limbs of {limb_bits} bits")]
    OutOfRange { limb_bits: usize, limb_count: usize },

    /// The signature component `r` has no modular inverse (r = 0 mod n).
    #[error("signature component r is not invertible modulo the curve order")]
    NotInvertible,

    /// A scalar is not reduced modulo the subgroup order.
    #[error("scalar is not reduced modulo the subgroup order")]
    InvalidScalar,

    /// A point does not lie on the expected curve.
    #[error("point is not on the curve")]
    InvalidPoint,

    /// A byte string is not a canonical encoding of the expected type.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(&'static str),
}
