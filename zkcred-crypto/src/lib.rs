//! Cryptographic building blocks for attestation witness preparation.
//!
//! Everything in this crate is a deterministic, synchronous computation over
//! explicit inputs: the Poseidon hashing capability, the Baby Jubjub EdDSA
//! scheme used to sign attestations, the secp256k1 auxiliary-point recovery
//! for precomputed-signature circuits, and the limb encoders that express
//! foreign-field values as circuit registers.

pub mod babyjubjub;
pub mod eddsa;
mod error;
pub mod field;
pub mod limbs;
pub mod poseidon;
pub mod recover;

pub use error::CryptoError;
pub use poseidon::NativeHasher;

/// The circuit's native field.
pub use halo2curves_axiom::bn256::Fr;
