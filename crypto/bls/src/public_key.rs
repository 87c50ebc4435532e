use crate::{Error, PublicKeyBytes};
use blst::min_pk as blst_core;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use ssz::{Decode, Encode};
use std::fmt;
use std::hash::{Hash, Hasher};
use tree_hash::TreeHash;

/// The byte-length of a BLS public key when serialized in compressed form.
pub const PUBLIC_KEY_BYTES_LEN: usize = 48;

/// Represents the public key at infinity.
pub const INFINITY_PUBLIC_KEY: [u8; PUBLIC_KEY_BYTES_LEN] = [
    0xc0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// A BLS public key which is known to be a valid, non-infinity point in the G1 subgroup.
///
/// The only ways to obtain one are `SecretKey::public_key`, `AggregatePublicKey::to_public_key`
/// and `Self::deserialize`, all of which uphold that invariant.
#[derive(Clone)]
pub struct PublicKey {
    /// The underlying point which performs *actual* cryptographic operations.
    point: blst_core::PublicKey,
}

impl PublicKey {
    /// Instantiates `Self` from a `point`.
    pub(crate) fn from_point(point: blst_core::PublicKey) -> Self {
        Self { point }
    }

    /// Returns a reference to the underlying BLS point.
    pub(crate) fn point(&self) -> &blst_core::PublicKey {
        &self.point
    }

    /// Returns `self.serialize()` as a `0x`-prefixed hex string.
    pub fn as_hex_string(&self) -> String {
        format!("{:?}", self)
    }

    /// Returns `self` in the compressed `PublicKeyBytes` representation.
    pub fn compress(&self) -> PublicKeyBytes {
        PublicKeyBytes::from(self)
    }

    /// Serialize `self` as compressed bytes.
    pub fn serialize(&self) -> [u8; PUBLIC_KEY_BYTES_LEN] {
        self.point.compress()
    }

    /// Deserialize `self` from compressed (big-endian) bytes.
    ///
    /// Rejects encodings that are the wrong length, not on the curve, outside the G1 subgroup or
    /// that represent the point at infinity. An infinity key would verify any aggregate in which
    /// it participates, so it is refused with a dedicated error.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != PUBLIC_KEY_BYTES_LEN {
            return Err(Error::InvalidByteLength {
                got: bytes.len(),
                expected: PUBLIC_KEY_BYTES_LEN,
            });
        }

        if bytes == &INFINITY_PUBLIC_KEY[..] {
            return Err(Error::InvalidInfinityPublicKey);
        }

        // `key_validate` decompresses, then checks for infinity and subgroup membership.
        let point = blst_core::PublicKey::key_validate(bytes)?;

        Ok(Self { point })
    }
}

impl Eq for PublicKey {}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.serialize()[..] == other.serialize()[..]
    }
}

/// Hashes the `self.serialize()` bytes.
impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.serialize()[..].hash(state);
    }
}

impl Encode for PublicKey {
    impl_ssz_encode!(PUBLIC_KEY_BYTES_LEN);
}

impl Decode for PublicKey {
    impl_ssz_decode!(PUBLIC_KEY_BYTES_LEN);
}

impl TreeHash for PublicKey {
    impl_tree_hash!(PUBLIC_KEY_BYTES_LEN);
}

impl fmt::Display for PublicKey {
    impl_display!();
}

impl std::str::FromStr for PublicKey {
    impl_from_str!();
}

impl Serialize for PublicKey {
    impl_serde_serialize!();
}

impl<'de> Deserialize<'de> for PublicKey {
    impl_serde_deserialize!();
}

impl fmt::Debug for PublicKey {
    impl_debug!();
}
