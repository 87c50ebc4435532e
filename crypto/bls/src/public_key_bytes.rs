use crate::{Error, PublicKey, PUBLIC_KEY_BYTES_LEN};
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use ssz::{Decode, Encode};
use std::fmt;
use tree_hash::TreeHash;

/// A wrapper around some bytes that may or may not be a `PublicKey` in compressed form.
///
/// This is the representation stored in the validator registry: decompressing and subgroup
/// checking a key is expensive, so it is only done when a key is actually needed for
/// verification.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKeyBytes {
    bytes: [u8; PUBLIC_KEY_BYTES_LEN],
}

impl PublicKeyBytes {
    /// Instantiates `Self` with all-zeros.
    pub fn empty() -> Self {
        Self {
            bytes: [0; PUBLIC_KEY_BYTES_LEN],
        }
    }

    /// Decompress and deserialize the bytes in `self` into an actual public key.
    ///
    /// May fail if the bytes are invalid.
    pub fn decompress(&self) -> Result<PublicKey, Error> {
        PublicKey::deserialize(&self.bytes)
    }

    /// Returns a slice of the bytes contained in `self`.
    ///
    /// The bytes are not verified (i.e., they may not represent a valid BLS point).
    pub fn as_serialized(&self) -> &[u8] {
        &self.bytes
    }

    /// Clones the bytes in `self`.
    ///
    /// The bytes are not verified (i.e., they may not represent a valid BLS point).
    pub fn serialize(&self) -> [u8; PUBLIC_KEY_BYTES_LEN] {
        self.bytes
    }

    /// Returns `self.serialize()` as a `0x`-prefixed hex string.
    pub fn as_hex_string(&self) -> String {
        format!("{:?}", self)
    }

    /// Instantiates `Self` from bytes.
    ///
    /// Only the byte-length is checked, the bytes may not represent a valid BLS point.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() == PUBLIC_KEY_BYTES_LEN {
            let mut pk_bytes = [0; PUBLIC_KEY_BYTES_LEN];
            pk_bytes[..].copy_from_slice(bytes);
            Ok(Self { bytes: pk_bytes })
        } else {
            Err(Error::InvalidByteLength {
                got: bytes.len(),
                expected: PUBLIC_KEY_BYTES_LEN,
            })
        }
    }
}

impl From<&PublicKey> for PublicKeyBytes {
    fn from(pk: &PublicKey) -> Self {
        Self {
            bytes: pk.serialize(),
        }
    }
}

impl From<PublicKey> for PublicKeyBytes {
    fn from(pk: PublicKey) -> Self {
        Self::from(&pk)
    }
}

impl Encode for PublicKeyBytes {
    impl_ssz_encode!(PUBLIC_KEY_BYTES_LEN);
}

impl Decode for PublicKeyBytes {
    impl_ssz_decode!(PUBLIC_KEY_BYTES_LEN);
}

impl TreeHash for PublicKeyBytes {
    impl_tree_hash!(PUBLIC_KEY_BYTES_LEN);
}

impl fmt::Display for PublicKeyBytes {
    impl_display!();
}

impl std::str::FromStr for PublicKeyBytes {
    impl_from_str!();
}

impl Serialize for PublicKeyBytes {
    impl_serde_serialize!();
}

impl<'de> Deserialize<'de> for PublicKeyBytes {
    impl_serde_deserialize!();
}

impl fmt::Debug for PublicKeyBytes {
    impl_debug!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_length_is_rejected() {
        assert_eq!(
            PublicKeyBytes::deserialize(&[1; 47]),
            Err(Error::InvalidByteLength {
                got: 47,
                expected: PUBLIC_KEY_BYTES_LEN
            })
        );
    }

    #[test]
    fn empty_does_not_decompress() {
        assert!(PublicKeyBytes::empty().decompress().is_err());
    }
}
