use crate::{Error, Hash256, PublicKey, Signature, DST, INFINITY_SIGNATURE, SIGNATURE_BYTES_LEN};
use blst::min_pk as blst_core;
use blst::BLST_ERROR;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use ssz::{Decode, Encode};
use std::fmt;
use tree_hash::TreeHash;

/// A BLS aggregate signature, the sum of zero or more `Signature`s.
///
/// The "empty" aggregate (no signatures added yet) serializes to all-zeros, like an empty
/// `Signature`, and never verifies.
#[derive(Clone)]
pub struct AggregateSignature {
    point: Option<blst_core::AggregateSignature>,
}

impl AggregateSignature {
    /// Initialize `Self` to the "empty" value.
    pub fn empty() -> Self {
        Self { point: None }
    }

    /// Returns `true` if `self` is equal to the "empty" value.
    pub fn is_empty(&self) -> bool {
        self.point.is_none()
    }

    /// Aggregates `signatures` by point addition.
    pub fn aggregate(signatures: &[&Signature]) -> Result<Self, Error> {
        if signatures.is_empty() {
            return Err(Error::EmptyAggregate);
        }

        let mut agg = Self::empty();
        for sig in signatures {
            agg.add_assign(sig)?;
        }
        Ok(agg)
    }

    /// Deserializes each of `bytes` as a compressed signature, then aggregates them.
    pub fn aggregate_bytes(bytes: &[&[u8]]) -> Result<Self, Error> {
        let signatures = bytes
            .iter()
            .map(|b| Signature::deserialize(b))
            .collect::<Result<Vec<_>, _>>()?;
        let refs = signatures.iter().collect::<Vec<_>>();
        Self::aggregate(&refs)
    }

    /// Aggregates a signature onto `self`.
    pub fn add_assign(&mut self, other: &Signature) -> Result<(), Error> {
        let other_point = other.point().ok_or(Error::EmptySignatureInAggregate)?;

        match &mut self.point {
            Some(point) => point.add_signature(other_point, false)?,
            None => self.point = Some(blst_core::AggregateSignature::from_signature(other_point)),
        }
        Ok(())
    }

    /// Aggregates another aggregate signature onto `self`. Adding an empty aggregate is a no-op.
    pub fn add_assign_aggregate(&mut self, other: &Self) {
        if let Some(other_point) = &other.point {
            match &mut self.point {
                Some(point) => point.add_aggregate(other_point),
                None => self.point = Some(*other_point),
            }
        }
    }

    /// Returns the aggregate as a plain `Signature`, or the empty signature.
    pub fn to_signature(&self) -> Signature {
        self.point
            .as_ref()
            .map(|point| Signature::from_point(point.to_signature()))
            .unwrap_or_else(Signature::empty)
    }

    /// Serialize `self` as compressed bytes.
    pub fn serialize(&self) -> [u8; SIGNATURE_BYTES_LEN] {
        self.to_signature().serialize()
    }

    /// Deserialize `self` from compressed bytes.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let sig = Signature::deserialize(bytes)?;
        Ok(Self {
            point: sig.point().map(blst_core::AggregateSignature::from_signature),
        })
    }

    /// Returns `true` if `self` is the aggregate of signatures over `msg` by each of `pubkeys`.
    pub fn fast_aggregate_verify(&self, msg: Hash256, pubkeys: &[&PublicKey]) -> bool {
        let point = match &self.point {
            Some(point) => point.to_signature(),
            None => return false,
        };
        if pubkeys.is_empty() {
            return false;
        }

        let points = pubkeys.iter().map(|pk| pk.point()).collect::<Vec<_>>();
        point.fast_aggregate_verify(false, msg.as_bytes(), DST, &points) == BLST_ERROR::BLST_SUCCESS
    }

    /// Returns `true` if `self` is the aggregate of one signature per `(msgs[i], pubkeys[i])`.
    ///
    /// Mismatched or empty inputs never verify.
    pub fn aggregate_verify(&self, msgs: &[Hash256], pubkeys: &[&PublicKey]) -> bool {
        let point = match &self.point {
            Some(point) => point.to_signature(),
            None => return false,
        };
        if msgs.is_empty() || msgs.len() != pubkeys.len() {
            return false;
        }

        let msgs = msgs.iter().map(|msg| msg.as_bytes()).collect::<Vec<_>>();
        let points = pubkeys.iter().map(|pk| pk.point()).collect::<Vec<_>>();
        point.aggregate_verify(false, &msgs, DST, &points, false) == BLST_ERROR::BLST_SUCCESS
    }
}

impl From<&Signature> for AggregateSignature {
    fn from(sig: &Signature) -> Self {
        Self {
            point: sig.point().map(blst_core::AggregateSignature::from_signature),
        }
    }
}

impl PartialEq for AggregateSignature {
    fn eq(&self, other: &Self) -> bool {
        self.serialize()[..] == other.serialize()[..]
    }
}

impl Eq for AggregateSignature {}

impl Default for AggregateSignature {
    fn default() -> Self {
        Self::empty()
    }
}

impl Encode for AggregateSignature {
    impl_ssz_encode!(SIGNATURE_BYTES_LEN);
}

impl Decode for AggregateSignature {
    impl_ssz_decode!(SIGNATURE_BYTES_LEN);
}

impl TreeHash for AggregateSignature {
    impl_tree_hash!(SIGNATURE_BYTES_LEN);
}

impl fmt::Display for AggregateSignature {
    impl_display!();
}

impl std::str::FromStr for AggregateSignature {
    impl_from_str!();
}

impl Serialize for AggregateSignature {
    impl_serde_serialize!();
}

impl<'de> Deserialize<'de> for AggregateSignature {
    impl_serde_deserialize!();
}

impl fmt::Debug for AggregateSignature {
    impl_debug!();
}
