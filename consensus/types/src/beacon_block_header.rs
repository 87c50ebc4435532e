use crate::*;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

/// A header of a `BeaconBlock`.
///
/// A header is a block with its body replaced by the body's root, so both hash to the same
/// root.
#[derive(
    Debug, PartialEq, Eq, Hash, Clone, Default, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
pub struct BeaconBlockHeader {
    pub slot: Slot,
    #[serde(with = "serde_utils::quoted_u64")]
    pub proposer_index: u64,
    pub parent_root: Hash256,
    pub state_root: Hash256,
    pub body_root: Hash256,
}

impl SignedRoot for BeaconBlockHeader {}

impl BeaconBlockHeader {
    /// Returns the `tree_hash_root` of the header.
    pub fn canonical_root(&self) -> Hash256 {
        self.tree_hash_root()
    }

    /// Signs `self`, producing a `SignedBeaconBlockHeader`.
    pub fn sign(
        self,
        secret_key: &SecretKey,
        fork: &Fork,
        genesis_validators_root: Hash256,
        spec: &ChainSpec,
    ) -> SignedBeaconBlockHeader {
        let epoch = self.slot.epoch(spec.slots_per_epoch);
        let domain = spec.get_domain(epoch, Domain::BeaconProposer, fork, genesis_validators_root);
        let message = self.signing_root(domain);
        let signature = secret_key.sign(message);
        SignedBeaconBlockHeader {
            message: self,
            signature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    ssz_and_tree_hash_tests!(
        BeaconBlockHeader,
        BeaconBlockHeader {
            slot: Slot::new(3),
            proposer_index: 7,
            parent_root: Hash256::repeat_byte(1),
            state_root: Hash256::repeat_byte(2),
            body_root: Hash256::repeat_byte(3),
        }
    );

    #[test]
    fn every_field_affects_the_root() {
        let header = BeaconBlockHeader::default();
        let root = header.canonical_root();

        let variants = [
            BeaconBlockHeader {
                slot: Slot::new(1),
                ..header.clone()
            },
            BeaconBlockHeader {
                proposer_index: 1,
                ..header.clone()
            },
            BeaconBlockHeader {
                parent_root: Hash256::repeat_byte(1),
                ..header.clone()
            },
            BeaconBlockHeader {
                state_root: Hash256::repeat_byte(1),
                ..header.clone()
            },
            BeaconBlockHeader {
                body_root: Hash256::repeat_byte(1),
                ..header.clone()
            },
        ];

        for variant in variants.iter() {
            assert_ne!(variant.canonical_root(), root);
        }
    }
}
