use crate::{Error, Hash256, PublicKey, DST};
use blst::min_pk as blst_core;
use blst::BLST_ERROR;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use ssz::{Decode, Encode};
use std::fmt;
use tree_hash::TreeHash;

/// The byte-length of a BLS signature when serialized in compressed form.
pub const SIGNATURE_BYTES_LEN: usize = 96;

/// Represents the signature at infinity.
pub const INFINITY_SIGNATURE: [u8; SIGNATURE_BYTES_LEN] = [
    0xc0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0,
];

/// The compressed bytes used to represent `Signature::empty()`.
pub const NONE_SIGNATURE: [u8; SIGNATURE_BYTES_LEN] = [0; SIGNATURE_BYTES_LEN];

/// A BLS signature in G2.
///
/// May be "empty" (serialized as all-zeros), which is not a curve point at all. Empty signatures
/// never verify; they exist because blocks built by a proposer before signing carry one.
#[derive(Clone)]
pub struct Signature {
    /// The underlying point which performs *actual* cryptographic operations.
    point: Option<blst_core::Signature>,
}

impl Signature {
    /// Initialize self to the "empty" value. This value is serialized as all-zeros.
    pub fn empty() -> Self {
        Self { point: None }
    }

    /// Returns `true` if `self` is equal to the "empty" value.
    pub fn is_empty(&self) -> bool {
        self.point.is_none()
    }

    /// Instantiates `Self` from a `point`.
    pub(crate) fn from_point(point: blst_core::Signature) -> Self {
        Self { point: Some(point) }
    }

    /// Returns a reference to the underlying BLS point.
    pub(crate) fn point(&self) -> Option<&blst_core::Signature> {
        self.point.as_ref()
    }

    /// Serialize `self` as compressed bytes.
    pub fn serialize(&self) -> [u8; SIGNATURE_BYTES_LEN] {
        if let Some(point) = &self.point {
            point.compress()
        } else {
            NONE_SIGNATURE
        }
    }

    /// Deserialize `self` from compressed bytes.
    ///
    /// Points which are not on the curve or not in the G2 subgroup are rejected here, so that
    /// verification never needs to repeat the subgroup check.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != SIGNATURE_BYTES_LEN {
            return Err(Error::InvalidByteLength {
                got: bytes.len(),
                expected: SIGNATURE_BYTES_LEN,
            });
        }

        let point = if bytes == &NONE_SIGNATURE[..] {
            None
        } else {
            // The infinity signature is permitted here; it only verifies against an infinity key,
            // which `PublicKey::deserialize` refuses.
            Some(blst_core::Signature::sig_validate(bytes, false)?)
        };

        Ok(Self { point })
    }

    /// Returns `true` if `self` is a signature across `msg` by `pubkey`.
    pub fn verify(&self, pubkey: &PublicKey, msg: Hash256) -> bool {
        if let Some(point) = &self.point {
            point.verify(false, msg.as_bytes(), DST, &[], pubkey.point(), false)
                == BLST_ERROR::BLST_SUCCESS
        } else {
            false
        }
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.serialize()[..] == other.serialize()[..]
    }
}

impl Eq for Signature {}

impl Encode for Signature {
    impl_ssz_encode!(SIGNATURE_BYTES_LEN);
}

impl Decode for Signature {
    impl_ssz_decode!(SIGNATURE_BYTES_LEN);
}

impl TreeHash for Signature {
    impl_tree_hash!(SIGNATURE_BYTES_LEN);
}

impl fmt::Display for Signature {
    impl_display!();
}

impl std::str::FromStr for Signature {
    impl_from_str!();
}

impl Serialize for Signature {
    impl_serde_serialize!();
}

impl<'de> Deserialize<'de> for Signature {
    impl_serde_deserialize!();
}

impl fmt::Debug for Signature {
    impl_debug!();
}
