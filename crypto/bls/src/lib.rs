//! BLS12-381 signatures as used for Ethereum consensus, backed by `blst`.
//!
//! Public keys live in G1 (48 bytes compressed) and signatures in G2 (96 bytes compressed). All
//! pairing arithmetic is deferred to `blst`; this crate is responsible for:
//!
//! - Parsing, with the consensus rules layered on top (no infinity public keys, no zero secret
//!   keys, subgroup checks on decode).
//! - Signing and single verification.
//! - Aggregation of signatures and public keys.
//! - Batched verification of many `(signature, message, public key)` triples with a single
//!   multi-pairing.
//!
//! A parse failure is always an `Err`, a cryptographically invalid signature is always `false`.
//! Callers can rely on that distinction.

#[macro_use]
mod macros;
mod aggregate_public_key;
mod aggregate_signature;
mod keypair;
mod public_key;
mod public_key_bytes;
mod secret_key;
mod signature;
mod signature_set;
mod zeroize_hash;

pub use aggregate_public_key::AggregatePublicKey;
pub use aggregate_signature::AggregateSignature;
pub use keypair::Keypair;
pub use public_key::{PublicKey, INFINITY_PUBLIC_KEY, PUBLIC_KEY_BYTES_LEN};
pub use public_key_bytes::PublicKeyBytes;
pub use secret_key::{SecretKey, SECRET_KEY_BYTES_LEN};
pub use signature::{Signature, INFINITY_SIGNATURE, NONE_SIGNATURE, SIGNATURE_BYTES_LEN};
pub use signature_set::{verify_multiple_signatures, verify_signature_sets, SignatureSet};
pub use zeroize_hash::ZeroizeHash;

use blst::BLST_ERROR as BlstError;

pub type Hash256 = ethereum_types::H256;

/// The domain separation tag for the proof-of-possession ciphersuite with signatures in G2.
pub const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// An error was raised from the underlying `blst` library.
    BlstError(BlstError),
    /// The provided bytes were an incorrect length.
    InvalidByteLength { got: usize, expected: usize },
    /// The provided secret key bytes were an incorrect length.
    InvalidSecretKeyLength { got: usize, expected: usize },
    /// The public key represents the point at infinity, which is invalid.
    InvalidInfinityPublicKey,
    /// The secret key is all zero bytes, which is invalid.
    InvalidZeroSecretKey,
    /// The parallel inputs to a multiple-signature verification did not have equal lengths.
    MismatchedLengths {
        signatures: usize,
        messages: usize,
        public_keys: usize,
    },
    /// An "empty" (all-zero) signature was supplied for aggregation.
    EmptySignatureInAggregate,
    /// Aggregation was requested over zero inputs.
    EmptyAggregate,
}

impl From<BlstError> for Error {
    fn from(e: BlstError) -> Error {
        Error::BlstError(e)
    }
}
