use crate::{Error, PublicKey};
use blst::min_pk as blst_core;

/// The sum of several public keys, used when many signers sign the same message.
///
/// Never serialized directly; call `Self::to_public_key` to obtain something that can be.
#[derive(Clone)]
pub struct AggregatePublicKey {
    point: blst_core::AggregatePublicKey,
}

impl AggregatePublicKey {
    /// Sums `pubkeys`. Fails on an empty slice since there is no identity public key.
    pub fn aggregate(pubkeys: &[&PublicKey]) -> Result<Self, Error> {
        if pubkeys.is_empty() {
            return Err(Error::EmptyAggregate);
        }

        let points = pubkeys.iter().map(|pk| pk.point()).collect::<Vec<_>>();
        // Each `PublicKey` was validated when it was created.
        let point = blst_core::AggregatePublicKey::aggregate(&points, false)?;

        Ok(Self { point })
    }

    /// Deserializes each of `bytes` as a compressed public key, then sums them.
    pub fn aggregate_bytes(bytes: &[&[u8]]) -> Result<Self, Error> {
        let pubkeys = bytes
            .iter()
            .map(|b| PublicKey::deserialize(b))
            .collect::<Result<Vec<_>, _>>()?;
        let refs = pubkeys.iter().collect::<Vec<_>>();
        Self::aggregate(&refs)
    }

    /// Converts `self` into a regular public key.
    ///
    /// Keys that cancel each other out produce the point at infinity, which is not a valid
    /// `PublicKey`.
    pub fn to_public_key(&self) -> Result<PublicKey, Error> {
        let pk = self.point.to_public_key();
        PublicKey::deserialize(&pk.compress())
    }
}
